use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ProgressError;
use crate::domain::value_objects::ProgressPercent;

/// Which transitions an operator may make on a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// Any step to any step, including corrections such as 100% → 40%.
    #[default]
    Permissive,
    /// Progress may stay put or move forward only.
    MonotonicOnly,
}

impl ProgressPolicy {
    pub fn check(&self, from: ProgressPercent, to: ProgressPercent) -> Result<(), ProgressError> {
        match self {
            Self::MonotonicOnly if to < from => Err(ProgressError::Regression { from, to }),
            _ => Ok(()),
        }
    }
}

impl FromStr for ProgressPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "monotonic" | "monotonic_only" => Ok(Self::MonotonicOnly),
            other => Err(format!("invalid progress policy: {other}")),
        }
    }
}
