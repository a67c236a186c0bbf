//! Fulfillment progress scale and per-unit identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step on the fixed completion scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProgressPercent {
    #[default]
    P0,
    P20,
    P40,
    P60,
    P80,
    P100,
}

impl ProgressPercent {
    pub const ALL: [ProgressPercent; 6] = [Self::P0, Self::P20, Self::P40, Self::P60, Self::P80, Self::P100];

    pub fn value(&self) -> u8 {
        match self {
            Self::P0 => 0,
            Self::P20 => 20,
            Self::P40 => 40,
            Self::P60 => 60,
            Self::P80 => 80,
            Self::P100 => 100,
        }
    }

    /// Customers hear about 60% and 100% only.
    pub fn triggers_notification(&self) -> bool {
        matches!(self, Self::P60 | Self::P100)
    }
}

impl TryFrom<u8> for ProgressPercent {
    type Error = ProgressPercentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .ok_or(ProgressPercentError(value))
    }
}

impl From<ProgressPercent> for u8 {
    fn from(p: ProgressPercent) -> Self { p.value() }
}

impl fmt::Display for ProgressPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.value()) }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Progress must be one of 0, 20, 40, 60, 80, 100 (got {0})")]
pub struct ProgressPercentError(pub u8);

const KEY_SEPARATOR: char = '|';

/// Identity of one physical unit in an order: `productId|colorName|occurrence`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    pub product_id: String,
    pub color_name: String,
    pub occurrence: u32,
}

impl UnitKey {
    pub fn new(product_id: impl Into<String>, color_name: impl Into<String>, occurrence: u32) -> Self {
        Self { product_id: product_id.into(), color_name: color_name.into(), occurrence }
    }

    /// `productId|colorName`, the identity customers are told about.
    pub fn notification_key(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.product_id, self.color_name)
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}", self.product_id, self.color_name, self.occurrence)
    }
}

impl FromStr for UnitKey {
    type Err = UnitKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || UnitKeyError(s.to_string());
        // Product ids never contain the separator; color names might.
        let (product_id, rest) = s.split_once(KEY_SEPARATOR).ok_or_else(malformed)?;
        let (color_name, occurrence) = rest.rsplit_once(KEY_SEPARATOR).ok_or_else(malformed)?;
        if product_id.is_empty() {
            return Err(malformed());
        }
        let occurrence = occurrence.parse().map_err(|_| malformed())?;
        Ok(Self::new(product_id, color_name, occurrence))
    }
}

impl Serialize for UnitKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UnitKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Malformed unit key: {0}")]
pub struct UnitKeyError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_scale_values_accepted() {
        assert_eq!(ProgressPercent::try_from(60).unwrap(), ProgressPercent::P60);
        assert_eq!(ProgressPercent::try_from(50), Err(ProgressPercentError(50)));
        assert!(serde_json::from_str::<ProgressPercent>("101").is_err());
        assert_eq!(serde_json::to_string(&ProgressPercent::P80).unwrap(), "80");
    }

    #[test]
    fn test_notification_thresholds() {
        let notifying: Vec<u8> = ProgressPercent::ALL
            .into_iter()
            .filter(ProgressPercent::triggers_notification)
            .map(u8::from)
            .collect();
        assert_eq!(notifying, vec![60, 100]);
    }

    #[test]
    fn test_unit_key_text_form() {
        let key = UnitKey::new("p-1", "Bleu marine", 2);
        assert_eq!(key.to_string(), "p-1|Bleu marine|2");
        assert_eq!(key.notification_key(), "p-1|Bleu marine");
        assert_eq!("p-1|Bleu marine|2".parse::<UnitKey>().unwrap(), key);
        assert!("p-1|Bleu".parse::<UnitKey>().is_err());
        assert!("p-1|Bleu|x".parse::<UnitKey>().is_err());
    }
}
