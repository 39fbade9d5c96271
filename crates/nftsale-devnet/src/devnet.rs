//! The in-process chain.
//!
//! All chain state sits behind one [`Mutex`]: accounts' currency balances,
//! deployed contracts, per-account nonces and the clock. A call holds the
//! lock from signature check to receipt, so calls never interleave and a
//! reverted call leaves nothing behind but its execution cost.
//!
//! Execution costs are burned, not paid to anyone. The currency ledger's
//! supply accounting therefore stays checkable with
//! [`Devnet::verify_supply`] after any sequence of calls.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use nftsale_ledger::{BalanceLedger, FundsLedger, MockNft, TokenCollaborator};
use nftsale_market::Sale;
use nftsale_types::{
    Address, AssetId, CallContext, DevnetConfig, FeeConfig, FeeScale, Listing, ListingStatus,
    Result, SaleError, SaleEvent, SaleId,
};

use crate::receipt::TxReceipt;
use crate::signer::{self, Signer};
use crate::transaction::{Call, SignedTransaction, Transaction};

/// Mutable chain state, guarded by the devnet's lock.
#[derive(Debug)]
struct ChainState {
    ledger: BalanceLedger,
    sales: HashMap<Address, Sale>,
    tokens: HashMap<Address, MockNft>,
    /// `Address → next nonce`.
    nonces: HashMap<Address, u64>,
    /// Chain time, unix seconds.
    now: u64,
    receipts: Vec<TxReceipt>,
}

impl ChainState {
    fn nonce_of(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    fn sale(&self, address: &Address) -> Result<&Sale> {
        self.sales
            .get(address)
            .ok_or(SaleError::UnknownContract(*address))
    }

    fn token(&self, address: &Address) -> Result<&MockNft> {
        self.tokens
            .get(address)
            .ok_or(SaleError::UnknownContract(*address))
    }

    fn token_mut(&mut self, address: &Address) -> Result<&mut MockNft> {
        self.tokens
            .get_mut(address)
            .ok_or(SaleError::UnknownContract(*address))
    }
}

/// In-process chain hosting Sale and MockNft contracts.
#[derive(Debug)]
pub struct Devnet {
    config: DevnetConfig,
    accounts: Vec<Signer>,
    state: Mutex<ChainState>,
}

impl Devnet {
    /// Start a chain with `config.accounts` deterministic accounts, each
    /// funded with `config.initial_balance`.
    pub fn new(config: DevnetConfig) -> Result<Self> {
        config.validate()?;
        let balance = config.initial_balance_units()?;

        let accounts: Vec<Signer> = (0..config.accounts).map(Signer::dev_account).collect();
        let mut ledger = BalanceLedger::new();
        for account in &accounts {
            ledger.mint(account.address(), balance)?;
        }

        let now = config
            .start_time
            .unwrap_or_else(|| u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0));

        tracing::info!(
            accounts = accounts.len(),
            balance = %config.initial_balance,
            gas_price = config.gas_price,
            now,
            "Devnet started"
        );

        Ok(Self {
            config,
            accounts,
            state: Mutex::new(ChainState {
                ledger,
                sales: HashMap::new(),
                tokens: HashMap::new(),
                nonces: HashMap::new(),
                now,
                receipts: Vec::new(),
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChainState>> {
        self.state
            .lock()
            .map_err(|_| SaleError::Internal("devnet state lock poisoned".into()))
    }

    #[must_use]
    pub fn config(&self) -> &DevnetConfig {
        &self.config
    }

    /// The funded accounts, in index order.
    #[must_use]
    pub fn accounts(&self) -> &[Signer] {
        &self.accounts
    }

    /// Funded account number `index`.
    pub fn account(&self, index: usize) -> Result<&Signer> {
        self.accounts.get(index).ok_or_else(|| {
            SaleError::Configuration(format!(
                "account index {index} out of range for {} accounts",
                self.accounts.len()
            ))
        })
    }

    /// Execution cost of `call` at the configured gas price.
    #[must_use]
    pub fn execution_cost(&self, call: &Call) -> u128 {
        u128::from(call.gas()).saturating_mul(self.config.gas_price)
    }

    // -----------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------

    /// Build, sign and execute a call from `signer` with its next nonce.
    pub fn send(&self, signer: &Signer, value: u128, call: Call) -> Result<TxReceipt> {
        let mut state = self.lock()?;
        let from = signer.address();
        let tx = Transaction {
            from,
            nonce: state.nonce_of(&from),
            value,
            call,
        };
        self.execute(&mut state, &tx.sign(signer))
    }

    /// Execute a transaction signed elsewhere.
    pub fn submit(&self, signed: &SignedTransaction) -> Result<TxReceipt> {
        let mut state = self.lock()?;
        self.execute(&mut state, signed)
    }

    /// Authenticate, charge and dispatch one transaction.
    ///
    /// Rejections before the charge (bad signature, stale nonce, cost not
    /// payable) change nothing. After the charge the nonce is consumed and
    /// the cost is kept even if the call reverts.
    fn execute(&self, state: &mut ChainState, signed: &SignedTransaction) -> Result<TxReceipt> {
        let tx = &signed.tx;
        signer::verify(&tx.from, &tx.signing_payload(), &signed.signature)?;

        let expected = state.nonce_of(&tx.from);
        if tx.nonce != expected {
            return Err(SaleError::NonceMismatch {
                expected,
                actual: tx.nonce,
            });
        }

        let gas_used = tx.call.gas();
        let execution_cost = self.execution_cost(&tx.call);
        state
            .ledger
            .burn(&tx.from, execution_cost)
            .map_err(|e| match e {
                SaleError::InsufficientFunds { needed, available } => {
                    SaleError::InsufficientExecutionFunds { needed, available }
                }
                other => other,
            })?;
        state.nonces.insert(tx.from, expected + 1);

        let tx_hash = tx.hash();
        let (contract_address, events) = match Self::dispatch(state, tx) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    from = %tx.from.short(),
                    call = tx.call.name(),
                    nonce = tx.nonce,
                    error = %e,
                    "Transaction reverted"
                );
                return Err(e);
            }
        };

        let sale_id = events
            .iter()
            .any(|e| matches!(e, SaleEvent::SaleCompleted { .. }))
            .then(|| SaleId::deterministic(&tx_hash));

        let receipt = TxReceipt {
            tx_hash,
            from: tx.from,
            nonce: tx.nonce,
            call: tx.call.name().to_string(),
            gas_used,
            execution_cost,
            timestamp: state.now,
            contract_address,
            events,
            sale_id,
        };

        tracing::info!(
            tx = %receipt.tx_hash_hex(),
            from = %tx.from.short(),
            call = tx.call.name(),
            gas_used,
            events = receipt.events.len(),
            "Transaction executed"
        );

        state.receipts.push(receipt.clone());
        Ok(receipt)
    }

    /// Run the call against contract state. Every contract method is
    /// all-or-nothing, so an error here leaves the state untouched.
    fn dispatch(
        state: &mut ChainState,
        tx: &Transaction,
    ) -> Result<(Option<Address>, Vec<SaleEvent>)> {
        if tx.value > 0 && !tx.call.is_payable() {
            return Err(SaleError::NotPayable {
                call: tx.call.name(),
            });
        }
        let ctx = CallContext::new(tx.from, state.now).with_value(tx.value);

        match &tx.call {
            Call::DeploySale {
                fee_recipient,
                fee_rate,
                fee_scale,
            } => {
                let fees = FeeConfig::new(*fee_recipient, *fee_rate, *fee_scale)?;
                let address = Address::contract(&tx.from, tx.nonce);
                state.sales.insert(address, Sale::new(address, fees));
                Ok((Some(address), Vec::new()))
            }
            Call::DeployMockNft => {
                let address = Address::contract(&tx.from, tx.nonce);
                state.tokens.insert(address, MockNft::new(address, tx.from));
                Ok((Some(address), Vec::new()))
            }
            Call::Mint {
                token,
                to,
                asset_id,
            } => {
                state.token_mut(token)?.mint(&tx.from, *to, *asset_id)?;
                Ok((None, Vec::new()))
            }
            Call::Approve {
                token,
                to,
                asset_id,
            } => {
                state.token_mut(token)?.approve(&tx.from, *to, *asset_id)?;
                Ok((None, Vec::new()))
            }
            Call::SetApprovalForAll {
                token,
                operator,
                approved,
            } => {
                state
                    .token_mut(token)?
                    .set_approval_for_all(&tx.from, *operator, *approved)?;
                Ok((None, Vec::new()))
            }
            Call::TransferFrom {
                token,
                from,
                to,
                asset_id,
            } => {
                state
                    .token_mut(token)?
                    .transfer_from(&tx.from, from, to, *asset_id)?;
                Ok((None, Vec::new()))
            }
            Call::ListItem {
                sale,
                token,
                asset_id,
                price,
                expires_at,
            } => {
                let token = state
                    .tokens
                    .get(token)
                    .ok_or(SaleError::UnknownContract(*token))?;
                let sale = state
                    .sales
                    .get_mut(sale)
                    .ok_or(SaleError::UnknownContract(*sale))?;
                let before = sale.events().len();
                sale.list_item(&ctx, token, *asset_id, *price, *expires_at)?;
                Ok((None, sale.events()[before..].to_vec()))
            }
            Call::CancelListing {
                sale,
                token,
                asset_id,
            } => {
                let sale = state
                    .sales
                    .get_mut(sale)
                    .ok_or(SaleError::UnknownContract(*sale))?;
                let before = sale.events().len();
                sale.cancel_listing(&ctx, *token, *asset_id)?;
                Ok((None, sale.events()[before..].to_vec()))
            }
            Call::BuyItem {
                sale,
                token,
                asset_id,
            } => {
                let token = state
                    .tokens
                    .get_mut(token)
                    .ok_or(SaleError::UnknownContract(*token))?;
                let sale = state
                    .sales
                    .get_mut(sale)
                    .ok_or(SaleError::UnknownContract(*sale))?;
                let before = sale.events().len();
                sale.buy_item(&ctx, token, &mut state.ledger, *asset_id)?;
                Ok((None, sale.events()[before..].to_vec()))
            }
        }
    }

    // -----------------------------------------------------------------
    // Call shorthands
    // -----------------------------------------------------------------

    /// Deploy a Sale contract. Returns its address.
    pub fn deploy_sale(
        &self,
        signer: &Signer,
        fee_recipient: Address,
        fee_rate: u16,
        fee_scale: FeeScale,
    ) -> Result<Address> {
        let receipt = self.send(
            signer,
            0,
            Call::DeploySale {
                fee_recipient,
                fee_rate,
                fee_scale,
            },
        )?;
        receipt
            .contract_address
            .ok_or_else(|| SaleError::Internal("deployment produced no address".into()))
    }

    /// Deploy a MockNft token with `signer` as minter. Returns its address.
    pub fn deploy_mock_nft(&self, signer: &Signer) -> Result<Address> {
        let receipt = self.send(signer, 0, Call::DeployMockNft)?;
        receipt
            .contract_address
            .ok_or_else(|| SaleError::Internal("deployment produced no address".into()))
    }

    pub fn mint(
        &self,
        signer: &Signer,
        token: Address,
        to: Address,
        asset_id: AssetId,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            0,
            Call::Mint {
                token,
                to,
                asset_id,
            },
        )
    }

    pub fn approve(
        &self,
        signer: &Signer,
        token: Address,
        to: Address,
        asset_id: AssetId,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            0,
            Call::Approve {
                token,
                to,
                asset_id,
            },
        )
    }

    pub fn set_approval_for_all(
        &self,
        signer: &Signer,
        token: Address,
        operator: Address,
        approved: bool,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            0,
            Call::SetApprovalForAll {
                token,
                operator,
                approved,
            },
        )
    }

    /// Move `asset_id` from `from` to `to`, with `signer` as operator.
    pub fn transfer_from(
        &self,
        signer: &Signer,
        token: Address,
        from: Address,
        to: Address,
        asset_id: AssetId,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            0,
            Call::TransferFrom {
                token,
                from,
                to,
                asset_id,
            },
        )
    }

    pub fn list_item(
        &self,
        signer: &Signer,
        sale: Address,
        token: Address,
        asset_id: AssetId,
        price: u128,
        expires_at: u64,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            0,
            Call::ListItem {
                sale,
                token,
                asset_id,
                price,
                expires_at,
            },
        )
    }

    pub fn cancel_listing(
        &self,
        signer: &Signer,
        sale: Address,
        token: Address,
        asset_id: AssetId,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            0,
            Call::CancelListing {
                sale,
                token,
                asset_id,
            },
        )
    }

    /// Buy `asset_id`, attaching `value` as payment.
    pub fn buy_item(
        &self,
        signer: &Signer,
        sale: Address,
        token: Address,
        asset_id: AssetId,
        value: u128,
    ) -> Result<TxReceipt> {
        self.send(
            signer,
            value,
            Call::BuyItem {
                sale,
                token,
                asset_id,
            },
        )
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn balance_of(&self, account: &Address) -> Result<u128> {
        Ok(self.lock()?.ledger.balance_of(account))
    }

    /// Next nonce `account` must use.
    pub fn nonce(&self, account: &Address) -> Result<u64> {
        Ok(self.lock()?.nonce_of(account))
    }

    pub fn owner_of(&self, token: &Address, asset_id: AssetId) -> Result<Option<Address>> {
        Ok(self.lock()?.token(token)?.owner_of(asset_id))
    }

    pub fn is_approved_for_all(
        &self,
        token: &Address,
        owner: &Address,
        operator: &Address,
    ) -> Result<bool> {
        Ok(self.lock()?.token(token)?.is_approved_for_all(owner, operator))
    }

    pub fn listing(
        &self,
        sale: &Address,
        token: Address,
        asset_id: AssetId,
    ) -> Result<Option<Listing>> {
        Ok(self.lock()?.sale(sale)?.listing(token, asset_id).cloned())
    }

    /// Listing status at the current chain time.
    pub fn listing_status(
        &self,
        sale: &Address,
        token: Address,
        asset_id: AssetId,
    ) -> Result<ListingStatus> {
        let state = self.lock()?;
        Ok(state.sale(sale)?.status(token, asset_id, state.now))
    }

    pub fn fee_config(&self, sale: &Address) -> Result<FeeConfig> {
        Ok(*self.lock()?.sale(sale)?.fee_config())
    }

    /// Every event a Sale contract has emitted.
    pub fn sale_events(&self, sale: &Address) -> Result<Vec<SaleEvent>> {
        Ok(self.lock()?.sale(sale)?.events().to_vec())
    }

    /// Number of successful transactions so far.
    ///
    /// The receipt log lives as long as the devnet and is never pruned.
    pub fn receipt_count(&self) -> Result<usize> {
        Ok(self.lock()?.receipts.len())
    }

    /// Receipts from position `start` onward, in execution order. Pair with
    /// [`Devnet::receipt_count`] to follow the log incrementally.
    pub fn receipts_since(&self, start: usize) -> Result<Vec<TxReceipt>> {
        let state = self.lock()?;
        Ok(state.receipts.get(start..).unwrap_or_default().to_vec())
    }

    /// Look up the receipt of a successful transaction by hash.
    pub fn receipt(&self, tx_hash: &[u8; 32]) -> Result<Option<TxReceipt>> {
        Ok(self
            .lock()?
            .receipts
            .iter()
            .find(|r| &r.tx_hash == tx_hash)
            .cloned())
    }

    /// Sweep listings already expired at the current chain time.
    pub fn prune_expired(&self, sale: &Address) -> Result<usize> {
        let mut state = self.lock()?;
        let now = state.now;
        let sale = state
            .sales
            .get_mut(sale)
            .ok_or(SaleError::UnknownContract(*sale))?;
        Ok(sale.prune_expired(now))
    }

    pub fn total_supply(&self) -> Result<u128> {
        Ok(self.lock()?.ledger.total_supply())
    }

    /// Check that balances sum to genesis funding minus burned costs.
    pub fn verify_supply(&self) -> Result<()> {
        self.lock()?.ledger.verify_supply()
    }

    // -----------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------

    /// Current chain time, unix seconds.
    pub fn now(&self) -> Result<u64> {
        Ok(self.lock()?.now)
    }

    /// Move the clock to `timestamp`. Time never runs backwards.
    pub fn set_time(&self, timestamp: u64) -> Result<()> {
        let mut state = self.lock()?;
        if timestamp < state.now {
            return Err(SaleError::Configuration(format!(
                "cannot move time back from {} to {timestamp}",
                state.now
            )));
        }
        state.now = timestamp;
        tracing::debug!(now = timestamp, "Clock set");
        Ok(())
    }

    /// Advance the clock by `seconds`. Returns the new time.
    pub fn advance_time(&self, seconds: u64) -> Result<u64> {
        let mut state = self.lock()?;
        state.now = state.now.saturating_add(seconds);
        tracing::debug!(now = state.now, seconds, "Clock advanced");
        Ok(state.now)
    }
}
