//! # nftsale-devnet
//!
//! **The execution environment**: an in-process chain that hosts Sale and
//! MockNft contracts and runs signed calls against them.
//!
//! ## Execution Model
//!
//! ```text
//! Signer ──sign──▶ SignedTransaction ──submit──▶ Devnet (one Mutex)
//!                                                  │ verify signature
//!                                                  │ check nonce
//!                                                  │ charge execution cost (burned)
//!                                                  │ dispatch call
//!                                                  ▼
//!                                           TxReceipt / SaleError
//! ```
//!
//! Every call runs to completion while holding the chain lock, so no two
//! calls interleave. The execution cost is charged before dispatch and is
//! kept even when the call reverts.
//!
//! The [`deploy`] module is the deployment script: it deploys a Sale with
//! the configured fee settings (and optionally a MockNft) and reports the
//! addresses.

pub mod deploy;
pub mod devnet;
pub mod receipt;
pub mod signer;
pub mod transaction;

pub use deploy::Deployment;
pub use devnet::Devnet;
pub use receipt::TxReceipt;
pub use signer::Signer;
pub use transaction::{Call, SignedTransaction, Transaction};
