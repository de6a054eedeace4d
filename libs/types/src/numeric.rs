//! Validated numeric types for the marketplace
//!
//! Bid amounts are whole credits. The type boundary rejects zero and
//! negative amounts so permissive caller-supplied numbers never reach
//! the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A positive whole-credit bid amount.
///
/// Construction is the validation point: `try_new` refuses anything
/// that is not a positive integer in range, and serde deserialization
/// goes through the same check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Credits(u32);

impl Credits {
    /// Try to create a credit amount, returning None for zero, negative,
    /// or out-of-range values.
    pub fn try_new(amount: i64) -> Option<Self> {
        if amount > 0 && amount <= u32::MAX as i64 {
            Some(Self(amount as u32))
        } else {
            None
        }
    }

    /// Get the raw credit count
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Credits {
    type Error = String;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Self::try_new(amount).ok_or_else(|| format!("credits must be a positive integer, got {}", amount))
    }
}

impl From<Credits> for i64 {
    fn from(credits: Credits) -> Self {
        credits.0 as i64
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
