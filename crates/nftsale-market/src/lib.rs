//! # nftsale-market
//!
//! **The protocol**: fixed-price listings and their atomic settlement.
//!
//! ## Architecture
//!
//! The [`Sale`] contract composes two parts:
//! 1. **ListingRegistry**: at most one listing per `(asset contract, asset id)`;
//!    ownership and approval are checked through the token collaborator
//! 2. **SettlementEngine**: validates a purchase, stages every effect in a
//!    [`SettlementPlan`], then commits payouts, asset transfer and listing
//!    removal together or not at all
//!
//! ## Purchase Flow
//!
//! ```text
//! buyItem → plan (listing? expired? exact value? owner+approval? funds?)
//!         → commit (payout batch → transferFrom → delete listing) → SaleCompleted
//! ```
//!
//! The contract performs no locking of its own: callers serialize access
//! (the devnet holds one mutex over all chain state).

pub mod registry;
pub mod sale;
pub mod settlement;

pub use registry::ListingRegistry;
pub use sale::Sale;
pub use settlement::{SettlementEngine, SettlementPlan};
