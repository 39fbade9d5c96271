//! Listing registry: at most one active listing per `(asset contract, asset id)`.
//!
//! Listing:
//! 1. Reject a zero price
//! 2. Reject an expiration that is not strictly in the future
//! 3. Ask the token collaborator whether the caller owns the asset and has
//!    authorised the Sale contract to move it
//! 4. Upsert the record
//!
//! Expired records are kept; only the purchase-time guard treats them as
//! void. [`ListingRegistry::prune_expired`] is an optional sweep.

use std::collections::HashMap;

use nftsale_ledger::TokenCollaborator;
use nftsale_types::{
    Address, AssetId, CallContext, Listing, ListingKey, ListingStatus, Result, SaleError,
    SaleEvent,
};

/// Owns every listing record.
#[derive(Debug, Clone, Default)]
pub struct ListingRegistry {
    listings: HashMap<ListingKey, Listing>,
}

impl ListingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the listing for `(token, asset_id)` with the caller
    /// as seller.
    ///
    /// `operator` is the Sale contract's own address: the account that will
    /// later move the asset at settlement.
    ///
    /// # Errors
    /// - `InvalidPrice` if `price == 0`
    /// - `InvalidExpiration` if `expires_at <= ctx.timestamp`
    /// - `NotOwnerOrNotApproved` if the caller does not own the asset or
    ///   `operator` is not approved for it
    pub fn list_item<T: TokenCollaborator + ?Sized>(
        &mut self,
        ctx: &CallContext,
        operator: &Address,
        token: &T,
        asset_id: AssetId,
        price: u128,
        expires_at: u64,
    ) -> Result<SaleEvent> {
        if price == 0 {
            return Err(SaleError::InvalidPrice);
        }
        if expires_at <= ctx.timestamp {
            return Err(SaleError::InvalidExpiration {
                expires_at,
                now: ctx.timestamp,
            });
        }

        let owns = token.owner_of(asset_id) == Some(ctx.caller);
        let approved = token.is_approved_for_all(&ctx.caller, operator)
            || token.get_approved(asset_id).as_ref() == Some(operator);
        if !owns || !approved {
            tracing::warn!(
                caller = %ctx.caller.short(),
                asset = %asset_id,
                owns,
                approved,
                "Listing rejected"
            );
            return Err(SaleError::NotOwnerOrNotApproved);
        }

        let key = ListingKey::new(token.address(), asset_id);
        let listing = Listing {
            seller: ctx.caller,
            price,
            expires_at,
        };
        if let Some(previous) = self.listings.insert(key, listing) {
            tracing::debug!(
                key = %key,
                previous_seller = %previous.seller.short(),
                previous_price = previous.price,
                "Listing replaced"
            );
        }

        tracing::info!(
            key = %key,
            seller = %ctx.caller.short(),
            price,
            expires_at,
            "Listing created"
        );

        Ok(SaleEvent::ListingCreated {
            asset_contract: key.asset_contract,
            asset_id,
            seller: ctx.caller,
            price,
            expires_at,
        })
    }

    /// Remove a listing on behalf of its seller.
    ///
    /// # Errors
    /// - `ListingNotFound` if no record exists
    /// - `NotSeller` if the caller is not the stored seller
    pub fn cancel_listing(&mut self, ctx: &CallContext, key: ListingKey) -> Result<SaleEvent> {
        let listing = self.listings.get(&key).ok_or(SaleError::ListingNotFound {
            asset_contract: key.asset_contract,
            asset_id: key.asset_id,
        })?;
        if listing.seller != ctx.caller {
            return Err(SaleError::NotSeller);
        }

        self.listings.remove(&key);
        tracing::info!(key = %key, seller = %ctx.caller.short(), "Listing cancelled");

        Ok(SaleEvent::ListingCancelled {
            asset_contract: key.asset_contract,
            asset_id: key.asset_id,
            seller: ctx.caller,
        })
    }

    /// Look up the listing for `key`.
    #[must_use]
    pub fn get(&self, key: &ListingKey) -> Option<&Listing> {
        self.listings.get(key)
    }

    /// Lazily evaluated status of `key` at `now`.
    #[must_use]
    pub fn status(&self, key: &ListingKey, now: u64) -> ListingStatus {
        match self.listings.get(key) {
            None => ListingStatus::Unlisted,
            Some(listing) if listing.is_expired_at(now) => ListingStatus::Expired,
            Some(_) => ListingStatus::Active,
        }
    }

    /// Drop every listing already expired at `now`. Returns how many were
    /// removed.
    pub fn prune_expired(&mut self, now: u64) -> usize {
        let before = self.listings.len();
        self.listings.retain(|_, listing| !listing.is_expired_at(now));
        let pruned = before - self.listings.len();
        if pruned > 0 {
            tracing::debug!(pruned, now, "Pruned expired listings");
        }
        pruned
    }

    /// Remove the record for `key` (settlement commit).
    pub(crate) fn remove(&mut self, key: &ListingKey) -> Option<Listing> {
        self.listings.remove(key)
    }

    /// Number of records, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
