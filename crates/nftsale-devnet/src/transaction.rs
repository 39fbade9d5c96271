//! Calls, transactions and their canonical signing payload.

use ed25519_dalek::Signature;
use nftsale_types::{Address, AssetId, FeeScale, constants};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::signer::Signer;

/// A contract call or deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    /// Deploy a Sale contract with immutable fee settings.
    DeploySale {
        fee_recipient: Address,
        fee_rate: u16,
        fee_scale: FeeScale,
    },
    /// Deploy a MockNft token; the sender becomes its minter.
    DeployMockNft,
    Mint {
        token: Address,
        to: Address,
        asset_id: AssetId,
    },
    Approve {
        token: Address,
        to: Address,
        asset_id: AssetId,
    },
    SetApprovalForAll {
        token: Address,
        operator: Address,
        approved: bool,
    },
    /// Move an asset as `from`'s owner or an approved operator.
    TransferFrom {
        token: Address,
        from: Address,
        to: Address,
        asset_id: AssetId,
    },
    ListItem {
        sale: Address,
        token: Address,
        asset_id: AssetId,
        price: u128,
        expires_at: u64,
    },
    CancelListing {
        sale: Address,
        token: Address,
        asset_id: AssetId,
    },
    /// The only payable call: the attached value is the purchase payment.
    BuyItem {
        sale: Address,
        token: Address,
        asset_id: AssetId,
    },
}

impl Call {
    /// Stable name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeploySale { .. } => "deploySale",
            Self::DeployMockNft => "deployMockNft",
            Self::Mint { .. } => "mint",
            Self::Approve { .. } => "approve",
            Self::SetApprovalForAll { .. } => "setApprovalForAll",
            Self::TransferFrom { .. } => "transferFrom",
            Self::ListItem { .. } => "listItem",
            Self::CancelListing { .. } => "cancelListing",
            Self::BuyItem { .. } => "buyItem",
        }
    }

    /// Gas charged for this call, whether it succeeds or reverts.
    #[must_use]
    pub fn gas(&self) -> u64 {
        match self {
            Self::DeploySale { .. } => constants::GAS_DEPLOY_SALE,
            Self::DeployMockNft => constants::GAS_DEPLOY_TOKEN,
            Self::Mint { .. } => constants::GAS_MINT,
            Self::Approve { .. } | Self::SetApprovalForAll { .. } => constants::GAS_APPROVE,
            Self::TransferFrom { .. } => constants::GAS_TRANSFER,
            Self::ListItem { .. } => constants::GAS_LIST_ITEM,
            Self::CancelListing { .. } => constants::GAS_CANCEL_LISTING,
            Self::BuyItem { .. } => constants::GAS_BUY_ITEM,
        }
    }

    #[must_use]
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::BuyItem { .. })
    }

    /// Append the canonical encoding: a one-byte tag then fixed-width fields.
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::DeploySale {
                fee_recipient,
                fee_rate,
                fee_scale,
            } => {
                out.push(0x01);
                out.extend_from_slice(fee_recipient.as_bytes());
                out.extend_from_slice(&fee_rate.to_le_bytes());
                out.extend_from_slice(&fee_scale.denominator().to_le_bytes());
            }
            Self::DeployMockNft => out.push(0x02),
            Self::Mint {
                token,
                to,
                asset_id,
            } => {
                out.push(0x03);
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(to.as_bytes());
                out.extend_from_slice(&asset_id.0.to_le_bytes());
            }
            Self::Approve {
                token,
                to,
                asset_id,
            } => {
                out.push(0x04);
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(to.as_bytes());
                out.extend_from_slice(&asset_id.0.to_le_bytes());
            }
            Self::SetApprovalForAll {
                token,
                operator,
                approved,
            } => {
                out.push(0x05);
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(operator.as_bytes());
                out.push(u8::from(*approved));
            }
            Self::TransferFrom {
                token,
                from,
                to,
                asset_id,
            } => {
                out.push(0x09);
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(from.as_bytes());
                out.extend_from_slice(to.as_bytes());
                out.extend_from_slice(&asset_id.0.to_le_bytes());
            }
            Self::ListItem {
                sale,
                token,
                asset_id,
                price,
                expires_at,
            } => {
                out.push(0x06);
                out.extend_from_slice(sale.as_bytes());
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(&asset_id.0.to_le_bytes());
                out.extend_from_slice(&price.to_le_bytes());
                out.extend_from_slice(&expires_at.to_le_bytes());
            }
            Self::CancelListing {
                sale,
                token,
                asset_id,
            } => {
                out.push(0x07);
                out.extend_from_slice(sale.as_bytes());
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(&asset_id.0.to_le_bytes());
            }
            Self::BuyItem {
                sale,
                token,
                asset_id,
            } => {
                out.push(0x08);
                out.extend_from_slice(sale.as_bytes());
                out.extend_from_slice(token.as_bytes());
                out.extend_from_slice(&asset_id.0.to_le_bytes());
            }
        }
    }
}

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    /// Must equal the sender's next nonce.
    pub nonce: u64,
    /// Currency attached to the call, in smallest units.
    pub value: u128,
    pub call: Call,
}

impl Transaction {
    /// Canonical signing payload.
    ///
    /// Format: `"nftsale:tx:v1:" || from || nonce || value || call`
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(192);
        payload.extend_from_slice(b"nftsale:tx:v1:");
        payload.extend_from_slice(self.from.as_bytes());
        payload.extend_from_slice(&self.nonce.to_le_bytes());
        payload.extend_from_slice(&self.value.to_le_bytes());
        self.call.encode(&mut payload);
        payload
    }

    /// `sha256(signing_payload)`.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(self.signing_payload()).into()
    }

    /// Sign with `signer`. The signer should be the key behind `from`;
    /// otherwise the devnet rejects the result.
    #[must_use]
    pub fn sign(self, signer: &Signer) -> SignedTransaction {
        let signature = signer.sign(&self.signing_payload());
        SignedTransaction {
            tx: self,
            signature,
        }
    }
}

/// A transaction with its ed25519 signature.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub signature: Signature,
}
