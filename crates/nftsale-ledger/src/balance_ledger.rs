//! Native-currency ledger.
//!
//! Tracks one balance per [`Address`]. Every mutation is atomic: either the
//! full operation succeeds or no balance changes. Batched payouts are
//! computed into a staging map first and written back only when every
//! debit and credit has been checked.

use std::collections::HashMap;

use nftsale_types::{Address, Result, SaleError};

use crate::supply::SupplyConservation;

/// One credit of a payout batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub to: Address,
    pub amount: u128,
}

impl Payout {
    #[must_use]
    pub fn new(to: Address, amount: u128) -> Self {
        Self { to, amount }
    }
}

/// The currency capability the settlement engine pays through.
pub trait FundsLedger {
    /// Current balance of `account` (zero if never funded).
    fn balance_of(&self, account: &Address) -> u128;

    /// Debit `from` once for the sum of `payouts` and credit every recipient.
    ///
    /// All-or-nothing: on error no balance has changed.
    fn transfer_batch(&mut self, from: &Address, payouts: &[Payout]) -> Result<()>;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.transfer_batch(from, &[Payout::new(*to, amount)])
    }
}

/// In-memory [`FundsLedger`] with supply accounting.
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    balances: HashMap<Address, u128>,
    supply: SupplyConservation,
}

impl BalanceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue new currency to `to` (genesis funding).
    ///
    /// # Errors
    /// Returns [`SaleError::BalanceOverflow`] if the credit does not fit.
    pub fn mint(&mut self, to: Address, amount: u128) -> Result<()> {
        let entry = self.balances.entry(to).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(SaleError::BalanceOverflow(to))?;
        self.supply.record_mint(amount);
        Ok(())
    }

    /// Destroy `amount` from `from` (execution costs).
    ///
    /// # Errors
    /// Returns [`SaleError::InsufficientFunds`] if the balance is too low.
    pub fn burn(&mut self, from: &Address, amount: u128) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(SaleError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        self.supply.record_burn(amount);
        Ok(())
    }

    /// Sum of every balance.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    /// Verify the supply conservation invariant.
    pub fn verify_supply(&self) -> Result<()> {
        self.supply.verify(self.total_supply())
    }

    /// Access the supply tracker.
    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }
}

impl FundsLedger for BalanceLedger {
    fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer_batch(&mut self, from: &Address, payouts: &[Payout]) -> Result<()> {
        let total = payouts
            .iter()
            .try_fold(0u128, |acc, p| acc.checked_add(p.amount))
            .ok_or(SaleError::BalanceOverflow(*from))?;

        let available = self.balance_of(from);
        if available < total {
            return Err(SaleError::InsufficientFunds {
                needed: total,
                available,
            });
        }

        // Stage every new balance before touching the real map.
        let mut staged: HashMap<Address, u128> = HashMap::with_capacity(payouts.len() + 1);
        staged.insert(*from, available - total);
        for payout in payouts {
            let current = staged
                .get(&payout.to)
                .copied()
                .unwrap_or_else(|| self.balance_of(&payout.to));
            let credited = current
                .checked_add(payout.amount)
                .ok_or(SaleError::BalanceOverflow(payout.to))?;
            staged.insert(payout.to, credited);
        }

        self.balances.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 32])
    }

    #[test]
    fn mint_increases_balance_and_supply() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 1_000).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 1_000);
        assert_eq!(ledger.total_supply(), 1_000);
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn transfer_moves_funds() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 1_000).unwrap();
        ledger.transfer(&addr(1), &addr(2), 400).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 600);
        assert_eq!(ledger.balance_of(&addr(2)), 400);
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn batch_pays_every_recipient() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 100).unwrap();
        ledger
            .transfer_batch(&addr(1), &[Payout::new(addr(2), 95), Payout::new(addr(3), 5)])
            .unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 0);
        assert_eq!(ledger.balance_of(&addr(2)), 95);
        assert_eq!(ledger.balance_of(&addr(3)), 5);
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn batch_insufficient_changes_nothing() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 50).unwrap();
        let err = ledger
            .transfer_batch(&addr(1), &[Payout::new(addr(2), 40), Payout::new(addr(3), 20)])
            .unwrap_err();
        assert!(matches!(
            err,
            SaleError::InsufficientFunds {
                needed: 60,
                available: 50
            }
        ));
        assert_eq!(ledger.balance_of(&addr(1)), 50);
        assert_eq!(ledger.balance_of(&addr(2)), 0);
        assert_eq!(ledger.balance_of(&addr(3)), 0);
    }

    #[test]
    fn batch_overflow_changes_nothing() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 10).unwrap();
        ledger.mint(addr(2), u128::MAX - 5).unwrap();
        let err = ledger
            .transfer_batch(&addr(1), &[Payout::new(addr(2), 10)])
            .unwrap_err();
        assert!(matches!(err, SaleError::BalanceOverflow(a) if a == addr(2)));
        assert_eq!(ledger.balance_of(&addr(1)), 10);
        assert_eq!(ledger.balance_of(&addr(2)), u128::MAX - 5);
    }

    #[test]
    fn self_payout_nets_out() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 100).unwrap();
        ledger
            .transfer_batch(&addr(1), &[Payout::new(addr(1), 60), Payout::new(addr(2), 40)])
            .unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 60);
        assert_eq!(ledger.balance_of(&addr(2)), 40);
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn burn_reduces_supply() {
        let mut ledger = BalanceLedger::new();
        ledger.mint(addr(1), 100).unwrap();
        ledger.burn(&addr(1), 30).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 70);
        assert_eq!(ledger.supply().total_burned(), 30);
        ledger.verify_supply().unwrap();
        assert!(ledger.burn(&addr(1), 71).is_err());
    }

    #[test]
    fn unknown_account_is_zero() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.balance_of(&addr(9)), 0);
    }
}
