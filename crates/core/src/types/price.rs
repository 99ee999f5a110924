//! Variant price as reported by Printify.

use serde::{Deserialize, Serialize};

/// A retail price in the shop's minor currency unit (e.g. cents for USD).
///
/// Printify reports prices as integers and the proxy passes them through
/// unchanged; the currency is a shop-level setting and is not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_minor_units(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}
