//! # nftsale-types
//!
//! Shared types, errors, and configuration for the **NftSale** listing and
//! settlement protocol.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetId`], [`SaleId`]
//! - **Listing model**: [`Listing`], [`ListingKey`], [`ListingStatus`]
//! - **Fees**: [`FeeConfig`], [`FeeScale`], [`PaymentSplit`]
//! - **Execution context**: [`CallContext`]
//! - **Events**: [`SaleEvent`]
//! - **Configuration**: [`DeployConfig`], [`DevnetConfig`]
//! - **Errors**: [`SaleError`] with `NS_ERR_` prefix codes
//! - **Units**: [`parse_units`], [`format_units`]
//! - **Constants**: defaults and gas schedule

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod fee;
pub mod ids;
pub mod listing;
pub mod units;

// Re-export all primary types at crate root for ergonomic imports:
//   use nftsale_types::{Address, Listing, SaleError, ...};

pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use fee::*;
pub use ids::*;
pub use listing::*;
pub use units::*;

// Constants are accessed via `nftsale_types::constants::FOO`
// (not re-exported to avoid name collisions).
