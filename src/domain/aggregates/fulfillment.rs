//! Per-unit fulfillment progress map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ProgressPercent, UnitKey};

/// Unit key (`productId|colorName|occurrence`) → completion step.
///
/// Absent keys read as 0%.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FulfillmentProgress(BTreeMap<String, ProgressPercent>);

impl FulfillmentProgress {
    pub fn get(&self, key: &UnitKey) -> ProgressPercent {
        self.0.get(&key.to_string()).copied().unwrap_or_default()
    }

    /// Stores `value`, returning what was there before.
    pub fn set(&mut self, key: &UnitKey, value: ProgressPercent) -> ProgressPercent {
        self.0.insert(key.to_string(), value).unwrap_or_default()
    }

    /// Rebuilds the map after units were renumbered. Each `(from, to)` pair
    /// moves the value stored under `from` to `to`; entries no pair moves
    /// are dropped and returned.
    pub fn carry_over(&mut self, moves: &[(UnitKey, UnitKey)]) -> Vec<String> {
        let mut previous = std::mem::take(&mut self.0);
        for (from, to) in moves {
            if let Some(value) = previous.remove(&from.to_string()) {
                self.0.insert(to.to_string(), value);
            }
        }
        previous.into_keys().collect()
    }

    /// Mean completion over `units`, in whole percent. No units reads as 0.
    pub fn completion(&self, units: &[UnitKey]) -> u8 {
        if units.is_empty() {
            return 0;
        }
        let total: usize = units.iter().map(|k| usize::from(self.get(k).value())).sum();
        // The mean of values in 0..=100 stays in 0..=100.
        u8::try_from(total / units.len()).unwrap_or(100)
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: u32) -> UnitKey { UnitKey::new("P1", "Bleu marine", i) }

    #[test]
    fn test_absent_reads_as_zero() {
        let mut progress = FulfillmentProgress::default();
        assert_eq!(progress.get(&key(0)), ProgressPercent::P0);
        assert_eq!(progress.set(&key(0), ProgressPercent::P40), ProgressPercent::P0);
        assert_eq!(progress.set(&key(0), ProgressPercent::P20), ProgressPercent::P40);
    }

    #[test]
    fn test_carry_over_and_completion() {
        let mut progress = FulfillmentProgress::default();
        progress.set(&key(0), ProgressPercent::P100);
        progress.set(&key(1), ProgressPercent::P40);
        progress.set(&key(2), ProgressPercent::P60);
        assert_eq!(progress.completion(&[key(0), key(1), key(2)]), 66);

        // Unit 1 goes away and unit 2 takes its index.
        let dropped = progress.carry_over(&[(key(0), key(0)), (key(2), key(1))]);
        assert_eq!(dropped, vec!["P1|Bleu marine|1".to_string()]);
        assert_eq!(progress.len(), 2);
        assert_eq!(progress.get(&key(1)), ProgressPercent::P60);
        assert_eq!(progress.get(&key(2)), ProgressPercent::P0);
        assert_eq!(progress.completion(&[key(0), key(1)]), 80);
        assert_eq!(progress.completion(&[]), 0);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut progress = FulfillmentProgress::default();
        progress.set(&key(1), ProgressPercent::P80);
        assert_eq!(serde_json::to_string(&progress).unwrap(), r#"{"P1|Bleu marine|1":80}"#);
    }
}
