//! The `Sale` contract: the externally callable surface of the protocol.
//!
//! Owns the listing registry, the fee settings and the event log. Each
//! call receives its [`CallContext`] and the collaborators it touches
//! explicitly; the contract keeps no handle to them.

use nftsale_ledger::{FundsLedger, TokenCollaborator};
use nftsale_types::{
    Address, AssetId, CallContext, FeeConfig, Listing, ListingKey, ListingStatus, PaymentSplit,
    Result, SaleEvent,
};

use crate::registry::ListingRegistry;
use crate::settlement::SettlementEngine;

/// Fixed-price marketplace contract.
#[derive(Debug, Clone)]
pub struct Sale {
    /// This contract's address; the operator tokens must approve.
    address: Address,
    settlement: SettlementEngine,
    registry: ListingRegistry,
    /// Append-only event log.
    events: Vec<SaleEvent>,
}

impl Sale {
    /// Construct a Sale contract at `address` with immutable fee settings.
    #[must_use]
    pub fn new(address: Address, fees: FeeConfig) -> Self {
        tracing::info!(sale = %address.short(), fees = %fees, "Sale contract constructed");
        Self {
            address,
            settlement: SettlementEngine::new(fees),
            registry: ListingRegistry::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn fee_config(&self) -> &FeeConfig {
        self.settlement.fees()
    }

    /// How a purchase at `price` would be divided.
    #[must_use]
    pub fn quote(&self, price: u128) -> PaymentSplit {
        self.settlement.fees().split(price)
    }

    /// List `asset_id` of `token` for `price` until `expires_at`.
    pub fn list_item<T: TokenCollaborator + ?Sized>(
        &mut self,
        ctx: &CallContext,
        token: &T,
        asset_id: AssetId,
        price: u128,
        expires_at: u64,
    ) -> Result<()> {
        let event = self
            .registry
            .list_item(ctx, &self.address, token, asset_id, price, expires_at)?;
        self.events.push(event);
        Ok(())
    }

    /// Withdraw the caller's listing for `(asset_contract, asset_id)`.
    pub fn cancel_listing(
        &mut self,
        ctx: &CallContext,
        asset_contract: Address,
        asset_id: AssetId,
    ) -> Result<()> {
        let event = self
            .registry
            .cancel_listing(ctx, ListingKey::new(asset_contract, asset_id))?;
        self.events.push(event);
        Ok(())
    }

    /// Buy `asset_id` of `token`, paying `ctx.value` from the caller's
    /// balance in `ledger`.
    pub fn buy_item<T, L>(
        &mut self,
        ctx: &CallContext,
        token: &mut T,
        ledger: &mut L,
        asset_id: AssetId,
    ) -> Result<()>
    where
        T: TokenCollaborator + ?Sized,
        L: FundsLedger + ?Sized,
    {
        let event = self.settlement.buy_item(
            ctx,
            &self.address,
            &mut self.registry,
            token,
            ledger,
            asset_id,
        )?;
        self.events.push(event);
        Ok(())
    }

    #[must_use]
    pub fn listing(&self, asset_contract: Address, asset_id: AssetId) -> Option<&Listing> {
        self.registry.get(&ListingKey::new(asset_contract, asset_id))
    }

    #[must_use]
    pub fn status(&self, asset_contract: Address, asset_id: AssetId, now: u64) -> ListingStatus {
        self.registry
            .status(&ListingKey::new(asset_contract, asset_id), now)
    }

    /// Optional sweep of expired listings.
    pub fn prune_expired(&mut self, now: u64) -> usize {
        self.registry.prune_expired(now)
    }

    #[must_use]
    pub fn registry(&self) -> &ListingRegistry {
        &self.registry
    }

    /// Every event emitted so far.
    #[must_use]
    pub fn events(&self) -> &[SaleEvent] {
        &self.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<SaleEvent> {
        std::mem::take(&mut self.events)
    }
}
