//! Observability events emitted by the Sale contract.
//!
//! Events form an append-only log per contract. The devnet copies the
//! events of each call onto its transaction receipt.

use serde::{Deserialize, Serialize};

use crate::{Address, AssetId};

/// A record of something the Sale contract did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleEvent {
    /// A listing was created or replaced.
    ListingCreated {
        asset_contract: Address,
        asset_id: AssetId,
        seller: Address,
        price: u128,
        expires_at: u64,
    },
    /// A seller withdrew their listing.
    ListingCancelled {
        asset_contract: Address,
        asset_id: AssetId,
        seller: Address,
    },
    /// A purchase settled: asset moved, proceeds disbursed, listing removed.
    SaleCompleted {
        asset_contract: Address,
        asset_id: AssetId,
        seller: Address,
        buyer: Address,
        price: u128,
    },
}

impl SaleEvent {
    /// Short uppercase name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListingCreated { .. } => "LISTING_CREATED",
            Self::ListingCancelled { .. } => "LISTING_CANCELLED",
            Self::SaleCompleted { .. } => "SALE_COMPLETED",
        }
    }
}

impl std::fmt::Display for SaleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListingCreated {
                asset_contract,
                asset_id,
                price,
                ..
            } => write!(f, "{} {}{} @ {price}", self.name(), asset_contract.short(), asset_id),
            Self::ListingCancelled {
                asset_contract,
                asset_id,
                ..
            } => write!(f, "{} {}{}", self.name(), asset_contract.short(), asset_id),
            Self::SaleCompleted {
                asset_contract,
                asset_id,
                buyer,
                price,
                ..
            } => write!(
                f,
                "{} {}{} -> {} @ {price}",
                self.name(),
                asset_contract.short(),
                asset_id,
                buyer.short()
            ),
        }
    }
}
