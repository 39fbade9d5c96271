//! End-to-end tests of the Sale contract against the in-memory collaborators.
//!
//! These exercise the listing → purchase lifecycle with a real `MockNft`
//! and `BalanceLedger`: the fee split, exact-payment rule, expiry boundary,
//! double purchase, unauthorised listing, stale listings, and the
//! all-or-nothing guarantee on every rejected call.

use nftsale_ledger::{BalanceLedger, FundsLedger, MockNft, TokenCollaborator};
use nftsale_market::Sale;
use nftsale_types::*;

const ETH: u128 = 1_000_000_000_000_000_000;
const NOW: u64 = 1_700_000_000;
const TWENTY_MINUTES: u64 = 20 * 60;

/// Accounts and contracts of one scenario.
struct Market {
    admin: Address,
    alice: Address,
    bob: Address,
    sale: Sale,
    nft: MockNft,
    ledger: BalanceLedger,
}

impl Market {
    /// admin deploys Sale(admin, 50 per-mille) and MockNft, mints #1 to
    /// alice; every account starts with 10 000 ETH.
    fn new() -> Self {
        Self::with_fees(FeeScale::PerMille, 50)
    }

    fn with_fees(scale: FeeScale, rate: u16) -> Self {
        let admin = Address([1u8; 32]);
        let alice = Address([2u8; 32]);
        let bob = Address([3u8; 32]);

        let sale = Sale::new(
            Address::contract(&admin, 0),
            FeeConfig::new(admin, rate, scale).unwrap(),
        );
        let mut nft = MockNft::new(Address::contract(&admin, 1), admin);
        nft.mint(&admin, alice, AssetId(1)).unwrap();

        let mut ledger = BalanceLedger::new();
        for account in [admin, alice, bob] {
            ledger.mint(account, 10_000 * ETH).unwrap();
        }

        Self {
            admin,
            alice,
            bob,
            sale,
            nft,
            ledger,
        }
    }

    fn approve_sale(&mut self, owner: Address) {
        self.nft
            .set_approval_for_all(&owner, self.sale.address(), true)
            .unwrap();
    }

    fn list(&mut self, seller: Address, id: u64, price: u128, expires_at: u64) -> Result<()> {
        self.sale.list_item(
            &CallContext::new(seller, NOW),
            &self.nft,
            AssetId(id),
            price,
            expires_at,
        )
    }

    fn buy(&mut self, buyer: Address, id: u64, value: u128, at: u64) -> Result<()> {
        self.sale.buy_item(
            &CallContext::new(buyer, at).with_value(value),
            &mut self.nft,
            &mut self.ledger,
            AssetId(id),
        )
    }

    fn balances(&self) -> [u128; 3] {
        [
            self.ledger.balance_of(&self.admin),
            self.ledger.balance_of(&self.alice),
            self.ledger.balance_of(&self.bob),
        ]
    }
}

// =============================================================================
// Listing then purchase: the stock scenario
// =============================================================================
#[test]
fn e2e_list_and_buy() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, 10 * ETH, NOW + TWENTY_MINUTES).unwrap();

    let [admin_before, alice_before, bob_before] = m.balances();
    m.buy(m.bob, 1, 10 * ETH, NOW + 5).unwrap();
    let [admin_after, alice_after, bob_after] = m.balances();

    assert_eq!(bob_before - bob_after, 10 * ETH);
    assert_eq!(alice_after - alice_before, parse_units("9.5", 18).unwrap());
    assert_eq!(admin_after - admin_before, parse_units("0.5", 18).unwrap());
    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.bob));
    assert!(m.sale.listing(m.nft.address(), AssetId(1)).is_none());
    m.ledger.verify_supply().unwrap();

    assert!(matches!(
        m.sale.events().last(),
        Some(SaleEvent::SaleCompleted { buyer, price, .. }) if *buyer == m.bob && *price == 10 * ETH
    ));
}

// =============================================================================
// Fee split exactness in basis points
// =============================================================================
#[test]
fn e2e_basis_point_split_is_exact() {
    for (price, rate) in [(10 * ETH, 50u16), (12_345, 250), (1, 9_999), (999_999, 1)] {
        let mut m = Market::with_fees(FeeScale::BasisPoints, rate);
        m.approve_sale(m.alice);
        m.list(m.alice, 1, price, NOW + 60).unwrap();

        let [admin_before, alice_before, bob_before] = m.balances();
        m.buy(m.bob, 1, price, NOW).unwrap();
        let [admin_after, alice_after, bob_after] = m.balances();

        let fee = price * u128::from(rate) / 10_000;
        assert_eq!(admin_after - admin_before, fee, "price={price} rate={rate}");
        assert_eq!(alice_after - alice_before, price - fee);
        assert_eq!(bob_before - bob_after, price);
    }
}

// =============================================================================
// Second purchase of the same key
// =============================================================================
#[test]
fn e2e_double_buy_fails_with_listing_not_found() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, 10 * ETH, NOW + 60).unwrap();
    m.buy(m.bob, 1, 10 * ETH, NOW).unwrap();

    let before = m.balances();
    let err = m.buy(m.bob, 1, 10 * ETH, NOW).unwrap_err();
    assert!(matches!(err, SaleError::ListingNotFound { .. }));
    assert_eq!(m.balances(), before);
}

// =============================================================================
// Expiry boundary
// =============================================================================
#[test]
fn e2e_buy_at_expiry_is_allowed() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, ETH, NOW + 60).unwrap();
    m.buy(m.bob, 1, ETH, NOW + 60).unwrap();
    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.bob));
}

#[test]
fn e2e_buy_after_expiry_fails() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, ETH, NOW + 60).unwrap();

    let before = m.balances();
    let err = m.buy(m.bob, 1, ETH, NOW + 61).unwrap_err();
    assert!(matches!(
        err,
        SaleError::ListingExpired {
            expires_at,
            now
        } if expires_at == NOW + 60 && now == NOW + 61
    ));
    assert_eq!(m.balances(), before);
    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.alice));
    // Expired listings are kept until re-listed, cancelled or pruned.
    assert_eq!(
        m.sale.status(m.nft.address(), AssetId(1), NOW + 61),
        ListingStatus::Expired
    );

    // Re-listing revives it.
    m.list(m.alice, 1, ETH, NOW + 600).unwrap();
    m.buy(m.bob, 1, ETH, NOW + 61).unwrap();
}

// =============================================================================
// Exact payment
// =============================================================================
#[test]
fn e2e_payment_mismatch_rejected() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, 10 * ETH, NOW + 60).unwrap();
    let before = m.balances();

    for value in [10 * ETH - 1, 10 * ETH + 1, 0, 20 * ETH] {
        let err = m.buy(m.bob, 1, value, NOW).unwrap_err();
        assert!(
            matches!(err, SaleError::IncorrectPayment { expected, actual } if expected == 10 * ETH && actual == value),
            "value={value}: {err}"
        );
    }
    assert_eq!(m.balances(), before);
    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.alice));
    assert!(m.sale.listing(m.nft.address(), AssetId(1)).is_some());
}

// =============================================================================
// Unauthorised listing
// =============================================================================
#[test]
fn e2e_unauthorised_listing_creates_nothing() {
    let mut m = Market::new();

    // Owner without approval.
    let err = m.list(m.alice, 1, ETH, NOW + 60).unwrap_err();
    assert!(matches!(err, SaleError::NotOwnerOrNotApproved));

    // Approved operator who is not the owner.
    m.approve_sale(m.bob);
    let err = m.list(m.bob, 1, ETH, NOW + 60).unwrap_err();
    assert!(matches!(err, SaleError::NotOwnerOrNotApproved));

    assert!(m.sale.registry().is_empty());
    assert!(m.sale.events().is_empty());
}

// =============================================================================
// Stale listing: seller moved the asset elsewhere
// =============================================================================
#[test]
fn e2e_stale_listing_fails_transfer_without_moving_funds() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, ETH, NOW + 60).unwrap();

    let (alice, admin) = (m.alice, m.admin);
    m.nft
        .transfer_from(&alice, &alice, &admin, AssetId(1))
        .unwrap();

    let before = m.balances();
    let err = m.buy(m.bob, 1, ETH, NOW).unwrap_err();
    assert!(matches!(err, SaleError::TransferFailed { .. }));
    assert_eq!(m.balances(), before);
    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.admin));
    assert!(m.sale.listing(m.nft.address(), AssetId(1)).is_some());
    m.ledger.verify_supply().unwrap();
}

// =============================================================================
// Buyer cannot fund the price
// =============================================================================
#[test]
fn e2e_unfunded_buyer_fails_payment() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, 20_000 * ETH, NOW + 60).unwrap();

    let before = m.balances();
    let err = m.buy(m.bob, 1, 20_000 * ETH, NOW).unwrap_err();
    assert!(matches!(err, SaleError::PaymentFailed { .. }));
    assert_eq!(m.balances(), before);
    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.alice));
    assert!(m.sale.listing(m.nft.address(), AssetId(1)).is_some());
}

// =============================================================================
// Cancellation
// =============================================================================
#[test]
fn e2e_cancelled_listing_cannot_be_bought() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, ETH, NOW + 60).unwrap();

    let token = m.nft.address();
    let err = m
        .sale
        .cancel_listing(&CallContext::new(m.bob, NOW), token, AssetId(1))
        .unwrap_err();
    assert!(matches!(err, SaleError::NotSeller));

    m.sale
        .cancel_listing(&CallContext::new(m.alice, NOW), token, AssetId(1))
        .unwrap();
    let err = m.buy(m.bob, 1, ETH, NOW).unwrap_err();
    assert!(matches!(err, SaleError::ListingNotFound { .. }));
}

// =============================================================================
// Resale: the buyer lists what they bought
// =============================================================================
#[test]
fn e2e_buyer_can_resell() {
    let mut m = Market::new();
    m.approve_sale(m.alice);
    m.list(m.alice, 1, ETH, NOW + 60).unwrap();
    m.buy(m.bob, 1, ETH, NOW).unwrap();

    // Bob's old approval state does not matter until he grants it.
    assert!(matches!(
        m.list(m.bob, 1, 2 * ETH, NOW + 60),
        Err(SaleError::NotOwnerOrNotApproved)
    ));
    m.approve_sale(m.bob);
    m.list(m.bob, 1, 2 * ETH, NOW + 60).unwrap();
    m.buy(m.alice, 1, 2 * ETH, NOW + 1).unwrap();

    assert_eq!(m.nft.owner_of(AssetId(1)), Some(m.alice));
    m.ledger.verify_supply().unwrap();
}
