//! Settlement engine: validate, stage, commit-or-discard.
//!
//! A purchase runs in two phases:
//!
//! **Plan** (read-only):
//! 1. Listing exists → else `ListingNotFound`
//! 2. `now <= expires_at` → else `ListingExpired`
//! 3. Attached value equals the price exactly → else `IncorrectPayment`
//! 4. Seller still owns the asset and the Sale contract may move it → else
//!    `TransferFailed`
//! 5. Buyer can fund the price → else `PaymentFailed`
//!
//! **Commit**:
//! 1. Pay fee recipient and seller in one atomic ledger batch
//! 2. Move the asset seller → buyer (reversing step 1 if this fails)
//! 3. Delete the listing
//!
//! A failed purchase leaves the registry, token ownership and every
//! balance exactly as they were.

use nftsale_ledger::{FundsLedger, Payout, TokenCollaborator};
use nftsale_types::{
    Address, AssetId, CallContext, FeeConfig, ListingKey, PaymentSplit, Result, SaleError,
    SaleEvent,
};

use crate::registry::ListingRegistry;

/// Every effect of one purchase, computed before anything is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementPlan {
    /// Listing being consumed.
    pub key: ListingKey,
    /// Current owner, receives `split.seller_amount`.
    pub seller: Address,
    /// Caller, pays `split.price` and receives the asset.
    pub buyer: Address,
    /// Fee / seller division of the price.
    pub split: PaymentSplit,
    /// Non-zero credits funded by the buyer.
    pub payouts: Vec<Payout>,
}

/// Stateless purchase logic parameterised by the contract's fee settings.
#[derive(Debug, Clone, Copy)]
pub struct SettlementEngine {
    fees: FeeConfig,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(fees: FeeConfig) -> Self {
        Self { fees }
    }

    #[must_use]
    pub fn fees(&self) -> &FeeConfig {
        &self.fees
    }

    /// Run every purchase check and stage the resulting effects.
    ///
    /// Mutates nothing.
    pub fn plan<T, L>(
        &self,
        ctx: &CallContext,
        operator: &Address,
        registry: &ListingRegistry,
        token: &T,
        ledger: &L,
        asset_id: AssetId,
    ) -> Result<SettlementPlan>
    where
        T: TokenCollaborator + ?Sized,
        L: FundsLedger + ?Sized,
    {
        let key = ListingKey::new(token.address(), asset_id);
        let listing = registry.get(&key).ok_or(SaleError::ListingNotFound {
            asset_contract: key.asset_contract,
            asset_id,
        })?;

        if listing.is_expired_at(ctx.timestamp) {
            return Err(SaleError::ListingExpired {
                expires_at: listing.expires_at,
                now: ctx.timestamp,
            });
        }
        if ctx.value != listing.price {
            return Err(SaleError::IncorrectPayment {
                expected: listing.price,
                actual: ctx.value,
            });
        }

        match token.owner_of(asset_id) {
            Some(owner) if owner == listing.seller => {}
            Some(owner) => {
                return Err(SaleError::TransferFailed {
                    reason: format!(
                        "seller {} no longer owns {asset_id} (owner {})",
                        listing.seller.short(),
                        owner.short()
                    ),
                });
            }
            None => {
                return Err(SaleError::TransferFailed {
                    reason: format!("{asset_id} does not exist"),
                });
            }
        }
        if !token.can_operate(&listing.seller, operator, asset_id) {
            return Err(SaleError::TransferFailed {
                reason: format!("sale contract no longer approved for {asset_id}"),
            });
        }

        let available = ledger.balance_of(&ctx.caller);
        if available < listing.price {
            return Err(SaleError::PaymentFailed {
                reason: format!(
                    "buyer balance {available} below price {}",
                    listing.price
                ),
            });
        }

        let split = self.fees.split(listing.price);
        let payouts = [
            Payout::new(self.fees.recipient, split.fee),
            Payout::new(listing.seller, split.seller_amount),
        ]
        .into_iter()
        .filter(|p| p.amount > 0)
        .collect();

        Ok(SettlementPlan {
            key,
            seller: listing.seller,
            buyer: ctx.caller,
            split,
            payouts,
        })
    }

    /// Apply a staged plan. Either every effect lands or none does.
    pub fn commit<T, L>(
        &self,
        plan: &SettlementPlan,
        operator: &Address,
        registry: &mut ListingRegistry,
        token: &mut T,
        ledger: &mut L,
    ) -> Result<SaleEvent>
    where
        T: TokenCollaborator + ?Sized,
        L: FundsLedger + ?Sized,
    {
        ledger
            .transfer_batch(&plan.buyer, &plan.payouts)
            .map_err(|e| SaleError::PaymentFailed {
                reason: e.to_string(),
            })?;

        if let Err(e) = token.transfer_from(operator, &plan.seller, &plan.buyer, plan.key.asset_id)
        {
            tracing::warn!(key = %plan.key, error = %e, "Asset transfer failed, reversing payouts");
            Self::reverse_payouts(plan, ledger)?;
            return Err(SaleError::TransferFailed {
                reason: e.to_string(),
            });
        }

        registry.remove(&plan.key);

        tracing::info!(
            key = %plan.key,
            seller = %plan.seller.short(),
            buyer = %plan.buyer.short(),
            price = plan.split.price,
            fee = plan.split.fee,
            seller_amount = plan.split.seller_amount,
            "Sale completed"
        );

        Ok(SaleEvent::SaleCompleted {
            asset_contract: plan.key.asset_contract,
            asset_id: plan.key.asset_id,
            seller: plan.seller,
            buyer: plan.buyer,
            price: plan.split.price,
        })
    }

    /// Plan and commit a purchase in one step.
    pub fn buy_item<T, L>(
        &self,
        ctx: &CallContext,
        operator: &Address,
        registry: &mut ListingRegistry,
        token: &mut T,
        ledger: &mut L,
        asset_id: AssetId,
    ) -> Result<SaleEvent>
    where
        T: TokenCollaborator + ?Sized,
        L: FundsLedger + ?Sized,
    {
        let plan = self.plan(ctx, operator, registry, token, ledger, asset_id)?;
        self.commit(&plan, operator, registry, token, ledger)
    }

    /// Undo a payout batch that already landed: each recipient returns
    /// exactly what it was credited.
    fn reverse_payouts<L: FundsLedger + ?Sized>(plan: &SettlementPlan, ledger: &mut L) -> Result<()> {
        for payout in &plan.payouts {
            ledger
                .transfer(&payout.to, &plan.buyer, payout.amount)
                .map_err(|e| {
                    SaleError::Internal(format!(
                        "failed to reverse payout to {}: {e}",
                        payout.to.short()
                    ))
                })?;
        }
        Ok(())
    }
}
