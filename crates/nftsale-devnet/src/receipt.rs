//! Receipts of executed transactions.

use nftsale_types::{Address, SaleEvent, SaleId};
use serde::{Deserialize, Serialize};

/// Proof that a transaction executed successfully.
///
/// Reverted transactions produce no receipt: the submitting call returns
/// the [`SaleError`](nftsale_types::SaleError) instead. Their execution
/// cost is still charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// `sha256` of the transaction's signing payload.
    pub tx_hash: [u8; 32],
    pub from: Address,
    pub nonce: u64,
    /// Stable call name (`"buyItem"`, ...).
    pub call: String,
    pub gas_used: u64,
    /// `gas_used * gas_price`, burned from the sender.
    pub execution_cost: u128,
    /// Chain time the call executed at (unix seconds).
    pub timestamp: u64,
    /// Address of the deployed contract, for deployments.
    pub contract_address: Option<Address>,
    /// Events the call emitted, in order.
    pub events: Vec<SaleEvent>,
    /// Set when the call completed a sale.
    pub sale_id: Option<SaleId>,
}

impl TxReceipt {
    /// Hex transaction hash for logs.
    #[must_use]
    pub fn tx_hash_hex(&self) -> String {
        hex::encode(self.tx_hash)
    }
}
