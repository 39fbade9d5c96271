//! # Listing: a seller's standing offer for one asset
//!
//! ## Lifecycle
//!
//! ```text
//!                listItem            buyItem
//!   ┌──────────┐ ─────────▶ ┌────────┐ ─────────▶ (removed: Sold)
//!   │ UNLISTED │            │ LISTED │
//!   └──────────┘ ◀───────── └───┬────┘
//!                 cancel        │ now > expires_at
//!                               ▼
//!                          (EXPIRED: lazy guard, record kept)
//! ```
//!
//! Records are never mutated in place. Re-listing the same key replaces
//! the record; selling or cancelling removes it. Expiry is evaluated at
//! purchase time only.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, AssetId};

/// Registry key: one listing per `(asset contract, asset id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ListingKey {
    /// The token contract holding the asset.
    pub asset_contract: Address,
    /// The asset within that contract.
    pub asset_id: AssetId,
}

impl ListingKey {
    #[must_use]
    pub fn new(asset_contract: Address, asset_id: AssetId) -> Self {
        Self {
            asset_contract,
            asset_id,
        }
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.asset_contract.short(), self.asset_id)
    }
}

/// A standing offer to sell one asset at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// The party entitled to the proceeds.
    pub seller: Address,
    /// Price in smallest currency units. Always `> 0`.
    pub price: u128,
    /// Last second (unix time) at which the listing can be bought.
    pub expires_at: u64,
}

impl Listing {
    /// Whether the listing can no longer be bought at `now`.
    ///
    /// The boundary is inclusive: a purchase at exactly `expires_at` is
    /// still accepted.
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

/// Lazily evaluated state of a listing key at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    /// No record for this key.
    Unlisted,
    /// A record exists and can be bought.
    Active,
    /// A record exists but its expiration has passed.
    Expired,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlisted => write!(f, "UNLISTED"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary_is_inclusive() {
        let listing = Listing {
            seller: Address([1u8; 32]),
            price: 10,
            expires_at: 1_000,
        };
        assert!(!listing.is_expired_at(999));
        assert!(!listing.is_expired_at(1_000));
        assert!(listing.is_expired_at(1_001));
    }

    #[test]
    fn keys_differ_by_contract_and_id() {
        let a = ListingKey::new(Address([1u8; 32]), AssetId(1));
        let b = ListingKey::new(Address([1u8; 32]), AssetId(2));
        let c = ListingKey::new(Address([2u8; 32]), AssetId(1));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ListingKey::new(Address([1u8; 32]), AssetId(1)));
    }

    #[test]
    fn status_display() {
        assert_eq!(ListingStatus::Active.to_string(), "ACTIVE");
        assert_eq!(ListingStatus::Expired.to_string(), "EXPIRED");
        assert_eq!(ListingStatus::Unlisted.to_string(), "UNLISTED");
    }

    #[test]
    fn listing_serde_roundtrip() {
        let listing = Listing {
            seller: Address([3u8; 32]),
            price: 10_000_000_000_000_000_000,
            expires_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&listing).unwrap();
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(listing, back);
    }
}
