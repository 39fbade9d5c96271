//! Supply conservation invariant checker.
//!
//! Invariant enforced by the ledger after every mutation batch:
//! ```text
//! Σ balances == Σ minted - Σ burned
//! ```
//!
//! Transfers and settlement payouts only move funds between accounts, so
//! they must never change the total.

use nftsale_types::{Result, SaleError};

/// Tracks currency issued into and removed from the ledger.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    /// Total minted since genesis.
    minted: u128,
    /// Total burned since genesis (execution costs).
    burned: u128,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record newly issued currency.
    pub fn record_mint(&mut self, amount: u128) {
        self.minted = self.minted.saturating_add(amount);
    }

    /// Record destroyed currency.
    pub fn record_burn(&mut self, amount: u128) {
        self.burned = self.burned.saturating_add(amount);
    }

    /// Expected total supply: minted - burned.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.minted.saturating_sub(self.burned)
    }

    /// Verify that the actual supply (sum of all balances) matches the
    /// expected supply.
    ///
    /// # Errors
    /// Returns [`SaleError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(SaleError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (minted={}, burned={})",
                    self.minted, self.burned
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_minted(&self) -> u128 {
        self.minted
    }

    #[must_use]
    pub fn total_burned(&self) -> u128 {
        self.burned
    }
}
