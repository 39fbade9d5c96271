//! Error types for the NftSale protocol.
//!
//! All errors use the `NS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Listing registry errors
//! - 2xx: Settlement errors
//! - 3xx: Collaborator (ledger / token) errors
//! - 4xx: Execution environment errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, AssetId};

/// Central error enum for all NftSale operations.
///
/// Every variant aborts the call that produced it; the protocol never
/// recovers locally.
#[derive(Debug, Error)]
pub enum SaleError {
    // =================================================================
    // Listing Registry Errors (1xx)
    // =================================================================
    /// A listing price of zero was requested.
    #[error("NS_ERR_100: Invalid price: must be greater than zero")]
    InvalidPrice,

    /// The expiration is not strictly in the future.
    #[error("NS_ERR_101: Invalid expiration: {expires_at} is not after {now}")]
    InvalidExpiration { expires_at: u64, now: u64 },

    /// The caller does not own the asset, or the Sale contract may not move it.
    #[error("NS_ERR_102: Caller is not the owner or the sale contract is not approved")]
    NotOwnerOrNotApproved,

    /// Only the seller may cancel a listing.
    #[error("NS_ERR_103: Caller is not the seller of this listing")]
    NotSeller,

    /// No listing exists for the requested key.
    #[error("NS_ERR_104: Listing not found for {asset_contract} {asset_id}")]
    ListingNotFound {
        asset_contract: Address,
        asset_id: AssetId,
    },

    // =================================================================
    // Settlement Errors (2xx)
    // =================================================================
    /// The listing's expiration has passed.
    #[error("NS_ERR_200: Listing expired at {expires_at}, now {now}")]
    ListingExpired { expires_at: u64, now: u64 },

    /// Attached value differs from the listing price.
    #[error("NS_ERR_201: Incorrect payment: expected {expected}, got {actual}")]
    IncorrectPayment { expected: u128, actual: u128 },

    /// The asset could not be moved from seller to buyer.
    #[error("NS_ERR_202: Asset transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Proceeds could not be disbursed to every recipient.
    #[error("NS_ERR_203: Payment failed: {reason}")]
    PaymentFailed { reason: String },

    // =================================================================
    // Collaborator Errors (3xx)
    // =================================================================
    /// Not enough currency to perform a debit.
    #[error("NS_ERR_300: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    /// A credit would overflow the recipient's balance.
    #[error("NS_ERR_301: Balance overflow crediting {0}")]
    BalanceOverflow(Address),

    /// The token contract refused an operation.
    #[error("NS_ERR_302: Token operation rejected: {reason}")]
    TokenRejected { reason: String },

    /// The asset id has never been minted.
    #[error("NS_ERR_303: Unknown asset {0}")]
    UnknownAsset(AssetId),

    /// Supply conservation invariant violated.
    #[error("NS_ERR_304: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Execution Environment Errors (4xx)
    // =================================================================
    /// The call signature did not verify against the sender's key.
    #[error("NS_ERR_400: Invalid call signature from {0}")]
    InvalidSignature(Address),

    /// No contract is deployed at this address.
    #[error("NS_ERR_401: No contract at {0}")]
    UnknownContract(Address),

    /// The sender cannot cover the execution cost of the call.
    #[error("NS_ERR_402: Cannot pay execution cost: need {needed}, have {available}")]
    InsufficientExecutionFunds { needed: u128, available: u128 },

    /// Transaction nonce does not match the sender's next nonce.
    #[error("NS_ERR_403: Nonce mismatch: expected {expected}, got {actual}")]
    NonceMismatch { expected: u64, actual: u64 },

    /// Value attached to a call that does not accept payment.
    #[error("NS_ERR_404: Call {call} is not payable")]
    NotPayable { call: &'static str },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Fee rate above its scale's denominator.
    #[error("NS_ERR_900: Invalid fee: rate {rate} exceeds {max}")]
    InvalidFee { rate: u16, max: u16 },

    /// A human-readable amount could not be converted to smallest units.
    #[error("NS_ERR_901: Invalid units: {0}")]
    InvalidUnits(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("NS_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("NS_ERR_903: Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("NS_ERR_904: I/O error: {0}")]
    Io(String),

    /// Unrecoverable internal error.
    #[error("NS_ERR_999: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SaleError>;

impl From<std::io::Error> for SaleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SaleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
