//! The token collaborator capability.
//!
//! The Sale contract never re-implements ownership or approval rules. It
//! asks the token contract through this trait, so any conforming asset
//! registry can be substituted.

use nftsale_types::{Address, AssetId, Result};

/// Ownership, approval and transfer surface of an ERC-721 style contract.
pub trait TokenCollaborator {
    /// Address of this token contract; the first half of a listing key.
    fn address(&self) -> Address;

    /// Current owner of `asset_id`, or `None` if it was never minted.
    fn owner_of(&self, asset_id: AssetId) -> Option<Address>;

    /// Whether `operator` may move every asset of `owner`.
    fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool;

    /// The single address approved to move `asset_id`, if any.
    fn get_approved(&self, asset_id: AssetId) -> Option<Address>;

    /// Move `asset_id` from `from` to `to`, acting as `operator`.
    ///
    /// Fails without side effects unless `from` owns the asset and
    /// `operator` is the owner or approved for it.
    fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<()>;

    /// Whether `operator` may move `asset_id` on behalf of `owner`.
    fn can_operate(&self, owner: &Address, operator: &Address, asset_id: AssetId) -> bool {
        owner == operator
            || self.is_approved_for_all(owner, operator)
            || self.get_approved(asset_id).as_ref() == Some(operator)
    }
}
