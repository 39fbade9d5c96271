//! `MockNft`: a minimal ERC-721 style token for tests and staging.
//!
//! Besides the [`TokenCollaborator`] surface it exposes a privileged
//! `mint`, per-asset `approve` and operator `set_approval_for_all`.
//! Transfers clear the per-asset approval, like ERC-721.

use std::collections::{HashMap, HashSet};

use nftsale_types::{Address, AssetId, Result, SaleError};

use crate::token::TokenCollaborator;

/// In-memory non-fungible token contract.
#[derive(Debug, Clone)]
pub struct MockNft {
    /// This contract's address.
    address: Address,
    /// The only account allowed to mint.
    minter: Address,
    /// Owner of every minted asset.
    owners: HashMap<AssetId, Address>,
    /// Per-asset approved address.
    approvals: HashMap<AssetId, Address>,
    /// `(owner, operator)` pairs approved for all assets.
    operators: HashSet<(Address, Address)>,
}

impl MockNft {
    /// Create an empty token contract whose minter is `minter`.
    #[must_use]
    pub fn new(address: Address, minter: Address) -> Self {
        Self {
            address,
            minter,
            owners: HashMap::new(),
            approvals: HashMap::new(),
            operators: HashSet::new(),
        }
    }

    /// Mint `asset_id` to `to`. Only the minter may call this.
    ///
    /// # Errors
    /// - `TokenRejected` if `caller` is not the minter, `to` is the zero
    ///   address, or the asset already exists
    pub fn mint(&mut self, caller: &Address, to: Address, asset_id: AssetId) -> Result<()> {
        if *caller != self.minter {
            return Err(SaleError::TokenRejected {
                reason: format!("{} is not the minter", caller.short()),
            });
        }
        if to.is_zero() {
            return Err(SaleError::TokenRejected {
                reason: "mint to the zero address".into(),
            });
        }
        if self.owners.contains_key(&asset_id) {
            return Err(SaleError::TokenRejected {
                reason: format!("asset {asset_id} already minted"),
            });
        }
        self.owners.insert(asset_id, to);
        tracing::debug!(token = %self.address.short(), asset = %asset_id, to = %to.short(), "Minted");
        Ok(())
    }

    /// Approve `to` to move `asset_id`. Caller must own the asset or be an
    /// operator of its owner. `Address::ZERO` clears the approval.
    pub fn approve(&mut self, caller: &Address, to: Address, asset_id: AssetId) -> Result<()> {
        let owner = self
            .owner_of(asset_id)
            .ok_or(SaleError::UnknownAsset(asset_id))?;
        if *caller != owner && !self.is_approved_for_all(&owner, caller) {
            return Err(SaleError::TokenRejected {
                reason: format!("{} may not approve {asset_id}", caller.short()),
            });
        }
        if to.is_zero() {
            self.approvals.remove(&asset_id);
        } else {
            self.approvals.insert(asset_id, to);
        }
        Ok(())
    }

    /// Grant or revoke `operator` rights over all of the caller's assets.
    pub fn set_approval_for_all(
        &mut self,
        caller: &Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        if *caller == operator {
            return Err(SaleError::TokenRejected {
                reason: "cannot approve self as operator".into(),
            });
        }
        if approved {
            self.operators.insert((*caller, operator));
        } else {
            self.operators.remove(&(*caller, operator));
        }
        Ok(())
    }

    /// Number of assets held by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: &Address) -> usize {
        self.owners.values().filter(|o| *o == owner).count()
    }

    #[must_use]
    pub fn minter(&self) -> Address {
        self.minter
    }
}

impl TokenCollaborator for MockNft {
    fn address(&self) -> Address {
        self.address
    }

    fn owner_of(&self, asset_id: AssetId) -> Option<Address> {
        self.owners.get(&asset_id).copied()
    }

    fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.operators.contains(&(*owner, *operator))
    }

    fn get_approved(&self, asset_id: AssetId) -> Option<Address> {
        self.approvals.get(&asset_id).copied()
    }

    fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<()> {
        let owner = self
            .owner_of(asset_id)
            .ok_or(SaleError::UnknownAsset(asset_id))?;
        if owner != *from {
            return Err(SaleError::TokenRejected {
                reason: format!("{} does not own {asset_id}", from.short()),
            });
        }
        if to.is_zero() {
            return Err(SaleError::TokenRejected {
                reason: "transfer to the zero address".into(),
            });
        }
        if !self.can_operate(from, operator, asset_id) {
            return Err(SaleError::TokenRejected {
                reason: format!("{} is not approved for {asset_id}", operator.short()),
            });
        }

        self.approvals.remove(&asset_id);
        self.owners.insert(asset_id, *to);
        tracing::debug!(
            token = %self.address.short(),
            asset = %asset_id,
            from = %from.short(),
            to = %to.short(),
            "Transferred"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 32])
    }

    fn token() -> MockNft {
        let mut nft = MockNft::new(addr(100), addr(1));
        nft.mint(&addr(1), addr(2), AssetId(1)).unwrap();
        nft
    }

    #[test]
    fn mint_sets_owner() {
        let nft = token();
        assert_eq!(nft.owner_of(AssetId(1)), Some(addr(2)));
        assert_eq!(nft.balance_of(&addr(2)), 1);
        assert_eq!(nft.owner_of(AssetId(2)), None);
    }

    #[test]
    fn only_minter_mints() {
        let mut nft = token();
        let err = nft.mint(&addr(2), addr(2), AssetId(2)).unwrap_err();
        assert!(matches!(err, SaleError::TokenRejected { .. }));
        assert!(nft.mint(&addr(1), addr(2), AssetId(1)).is_err(), "duplicate id");
        assert!(nft.mint(&addr(1), Address::ZERO, AssetId(3)).is_err());
    }

    #[test]
    fn owner_can_transfer() {
        let mut nft = token();
        nft.transfer_from(&addr(2), &addr(2), &addr(3), AssetId(1))
            .unwrap();
        assert_eq!(nft.owner_of(AssetId(1)), Some(addr(3)));
    }

    #[test]
    fn operator_needs_approval() {
        let mut nft = token();
        let operator = Address::random();
        let err = nft
            .transfer_from(&operator, &addr(2), &addr(3), AssetId(1))
            .unwrap_err();
        assert!(matches!(err, SaleError::TokenRejected { .. }));

        nft.set_approval_for_all(&addr(2), operator, true).unwrap();
        assert!(nft.is_approved_for_all(&addr(2), &operator));
        nft.transfer_from(&operator, &addr(2), &addr(3), AssetId(1))
            .unwrap();
        assert_eq!(nft.owner_of(AssetId(1)), Some(addr(3)));
    }

    #[test]
    fn revoked_operator_rejected() {
        let mut nft = token();
        nft.set_approval_for_all(&addr(2), addr(9), true).unwrap();
        nft.set_approval_for_all(&addr(2), addr(9), false).unwrap();
        assert!(nft
            .transfer_from(&addr(9), &addr(2), &addr(3), AssetId(1))
            .is_err());
    }

    #[test]
    fn single_asset_approval_cleared_on_transfer() {
        let mut nft = token();
        nft.approve(&addr(2), addr(9), AssetId(1)).unwrap();
        assert_eq!(nft.get_approved(AssetId(1)), Some(addr(9)));
        nft.transfer_from(&addr(9), &addr(2), &addr(3), AssetId(1))
            .unwrap();
        assert_eq!(nft.get_approved(AssetId(1)), None);
        // Old approval no longer works for the new owner's asset.
        assert!(nft
            .transfer_from(&addr(9), &addr(3), &addr(2), AssetId(1))
            .is_err());
    }

    #[test]
    fn transfer_from_wrong_owner_rejected() {
        let mut nft = token();
        let err = nft
            .transfer_from(&addr(3), &addr(3), &addr(4), AssetId(1))
            .unwrap_err();
        assert!(matches!(err, SaleError::TokenRejected { .. }));
        assert_eq!(nft.owner_of(AssetId(1)), Some(addr(2)));
    }

    #[test]
    fn unknown_asset() {
        let mut nft = token();
        let err = nft
            .transfer_from(&addr(2), &addr(2), &addr(3), AssetId(42))
            .unwrap_err();
        assert!(matches!(err, SaleError::UnknownAsset(AssetId(42))));
        assert!(nft.approve(&addr(2), addr(9), AssetId(42)).is_err());
    }

    #[test]
    fn non_owner_cannot_approve() {
        let mut nft = token();
        assert!(nft.approve(&addr(5), addr(9), AssetId(1)).is_err());
        assert!(nft.set_approval_for_all(&addr(2), addr(2), true).is_err());
    }
}
