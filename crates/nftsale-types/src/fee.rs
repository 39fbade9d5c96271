//! Fee configuration and the derived seller/fee payment split.
//!
//! A fee is a `rate` over a fixed denominator chosen by [`FeeScale`]:
//! basis points (`rate / 10_000`) or per-mille (`rate / 1_000`). The fee is
//! always rounded down; the seller receives the remainder, so the two parts
//! sum to exactly the price.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Result, SaleError};

/// Denominator convention for a fee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeScale {
    /// `rate / 10_000`: 1 bp = 0.01 %, so 50 is 0.5 %.
    BasisPoints,
    /// `rate / 1_000`: 50 is 5 %. The rate convention of the stock deployment.
    #[default]
    PerMille,
}

impl FeeScale {
    #[must_use]
    pub fn denominator(self) -> u16 {
        match self {
            Self::BasisPoints => 10_000,
            Self::PerMille => 1_000,
        }
    }
}

impl fmt::Display for FeeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BasisPoints => write!(f, "BP"),
            Self::PerMille => write!(f, "PERMILLE"),
        }
    }
}

/// Process-wide fee settings, fixed when a Sale contract is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Account that receives the fee part of every sale.
    pub recipient: Address,
    /// Fee rate, interpreted over `scale.denominator()`.
    pub rate: u16,
    /// Denominator convention for `rate`.
    pub scale: FeeScale,
}

impl FeeConfig {
    /// Validate and build a fee configuration.
    ///
    /// # Errors
    /// Returns [`SaleError::InvalidFee`] if `rate` exceeds the scale's
    /// denominator (a fee above 100 %).
    pub fn new(recipient: Address, rate: u16, scale: FeeScale) -> Result<Self> {
        let max = scale.denominator();
        if rate > max {
            return Err(SaleError::InvalidFee { rate, max });
        }
        Ok(Self {
            recipient,
            rate,
            scale,
        })
    }

    /// Basis-point fee configuration.
    pub fn basis_points(recipient: Address, rate: u16) -> Result<Self> {
        Self::new(recipient, rate, FeeScale::BasisPoints)
    }

    /// Split `price` into fee and seller proceeds.
    ///
    /// Computes `floor(price * rate / denominator)` without overflowing for
    /// any `u128` price by splitting `price` into whole multiples of the
    /// denominator and a remainder.
    #[must_use]
    pub fn split(&self, price: u128) -> PaymentSplit {
        let rate = u128::from(self.rate);
        let denom = u128::from(self.scale.denominator());
        let fee = (price / denom) * rate + (price % denom) * rate / denom;
        PaymentSplit {
            price,
            fee,
            seller_amount: price - fee,
        }
    }
}

impl fmt::Display for FeeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} to {}", self.rate, self.scale.denominator(), self.recipient)
    }
}

/// How one sale's price is divided. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// The full listing price paid by the buyer.
    pub price: u128,
    /// Part credited to the fee recipient.
    pub fee: u128,
    /// Part credited to the seller.
    pub seller_amount: u128,
}
