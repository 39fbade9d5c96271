//! System-wide constants for the NftSale protocol and devnet.

/// Fee rate used by the stock deployment (50 per-mille = 5 %).
pub const DEFAULT_FEE_RATE: u16 = 50;

/// Decimal places of the native currency (wei-style smallest units).
pub const NATIVE_DECIMALS: u32 = 18;

/// Number of funded signer accounts a fresh devnet creates.
pub const DEFAULT_DEV_ACCOUNTS: usize = 20;

/// Starting balance of each devnet account, in whole currency units.
pub const DEFAULT_ACCOUNT_BALANCE: &str = "10000";

/// Price of one unit of execution gas, in smallest currency units.
pub const DEFAULT_GAS_PRICE: u128 = 1_000_000_000;

/// Gas charged per call kind.
pub const GAS_DEPLOY_SALE: u64 = 1_200_000;
pub const GAS_DEPLOY_TOKEN: u64 = 1_500_000;
pub const GAS_MINT: u64 = 70_000;
pub const GAS_APPROVE: u64 = 46_000;
pub const GAS_TRANSFER: u64 = 60_000;
pub const GAS_LIST_ITEM: u64 = 95_000;
pub const GAS_CANCEL_LISTING: u64 = 30_000;
pub const GAS_BUY_ITEM: u64 = 120_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol name.
pub const PROTOCOL_NAME: &str = "NftSale";
