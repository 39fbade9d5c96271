//! Account keys.
//!
//! An account's [`Address`] is its ed25519 public key. Devnet accounts are
//! derived deterministically from their index, so every fresh devnet has
//! the same funded accounts.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use nftsale_types::{Address, Result, SaleError};
use sha2::{Digest, Sha256};

/// An externally owned account able to sign transactions.
#[derive(Clone)]
pub struct Signer {
    key: SigningKey,
    address: Address,
}

impl Signer {
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&seed);
        let address = Address(key.verifying_key().to_bytes());
        Self { key, address }
    }

    /// Deterministic devnet account number `index`.
    ///
    /// Seed: `sha256("nftsale:dev-account:v1:" || index)`.
    #[must_use]
    pub fn dev_account(index: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"nftsale:dev-account:v1:");
        hasher.update((index as u64).to_le_bytes());
        Self::from_seed(hasher.finalize().into())
    }

    /// Fresh account from the OS random source. Holds no funds on a devnet.
    #[must_use]
    pub fn random() -> Self {
        let key = SigningKey::generate(&mut rand::rngs::OsRng);
        let address = Address(key.verifying_key().to_bytes());
        Self { key, address }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn sign(&self, payload: &[u8]) -> Signature {
        self.key.sign(payload)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Check that `signature` over `payload` was produced by the key behind
/// `address`.
///
/// # Errors
/// Returns [`SaleError::InvalidSignature`] if the address is not a valid
/// public key or the signature does not verify.
pub fn verify(address: &Address, payload: &[u8], signature: &Signature) -> Result<()> {
    let key = VerifyingKey::from_bytes(address.as_bytes())
        .map_err(|_| SaleError::InvalidSignature(*address))?;
    key.verify(payload, signature)
        .map_err(|_| SaleError::InvalidSignature(*address))
}
