//! # nftsale-ledger
//!
//! **Collaborators** the Sale contract depends on but does not own:
//! currency balances and token ownership.
//!
//! ## Components
//!
//! 1. **FundsLedger / BalanceLedger**: per-account native currency with
//!    all-or-nothing payout batches
//! 2. **SupplyConservation**: Σ balances == Σ minted − Σ burned
//! 3. **TokenCollaborator**: ownership / approval / transfer capability
//! 4. **MockNft**: ERC-721 style test double with a privileged `mint`

pub mod balance_ledger;
pub mod mock_nft;
pub mod supply;
pub mod token;

pub use balance_ledger::{BalanceLedger, FundsLedger, Payout};
pub use mock_nft::MockNft;
pub use supply::SupplyConservation;
pub use token::TokenCollaborator;
