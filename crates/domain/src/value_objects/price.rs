//! Price value object for quoted reforge costs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A non-negative, finite amount of currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub const FREE: Price = Price(0.0);

    /// # Errors
    ///
    /// Returns `DomainError::Validation` for negative, NaN or infinite amounts.
    pub fn new(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(format!(
                "Price must be a finite, non-negative amount (got {})",
                amount
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> f64 {
        price.0
    }
}
