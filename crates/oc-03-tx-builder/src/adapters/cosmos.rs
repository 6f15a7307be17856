//! Cosmos SDK signer backed by chain queries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use oc_01_chain_client::{ChainError, ChainQueries};
use shared_crypto::{account_address, Secp256k1KeyPair};
use shared_types::{RetryDecision, RetryError, RetryPolicy, SignedTx, SubmissionMessage, TxHash};

use crate::domain::{
    build_tx, compute_fee, payload_any, FeeQuote, SignerError, TxContext, DEFAULT_FEE_DENOM,
    DEFAULT_GAS_ADJUSTMENT, TIMEOUT_HEIGHT_OFFSET,
};
use crate::ports::TxSigner;

/// Dry-run attempts per transaction.
const SIMULATE_ATTEMPTS: u32 = 3;
/// Delay between dry-run attempts.
const SIMULATE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Wallet-level signing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SignerParams {
    /// Bech32 human-readable prefix.
    pub address_prefix: String,
    /// Multiplier applied to simulated gas.
    pub gas_adjustment: f64,
    /// Fee denomination.
    pub fee_denom: String,
}

impl Default for SignerParams {
    fn default() -> Self {
        Self {
            address_prefix: "allo".to_string(),
            gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
            fee_denom: DEFAULT_FEE_DENOM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccountState {
    account_number: u64,
    sequence: u64,
    balance: u128,
}

/// Signs with a local secp256k1 key and tracks the account sequence.
pub struct CosmosTxSigner {
    keypair: Arc<Secp256k1KeyPair>,
    address: String,
    chain_id: String,
    gas_price: f64,
    params: SignerParams,
    queries: Arc<dyn ChainQueries>,
    account: Mutex<AccountState>,
    simulate_policy: RetryPolicy,
}

impl std::fmt::Debug for CosmosTxSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmosTxSigner")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("account", &*self.account.lock())
            .finish_non_exhaustive()
    }
}

impl CosmosTxSigner {
    /// Derive the wallet address and load chain id, gas price, account
    /// number, sequence and balance.
    pub async fn bootstrap(
        keypair: Arc<Secp256k1KeyPair>,
        params: SignerParams,
        queries: Arc<dyn ChainQueries>,
    ) -> Result<Self, SignerError> {
        let address = account_address(&params.address_prefix, &keypair.public_key())?;

        let chain_id = queries.chain_id().await?;
        let gas_price = queries.gas_price(&params.fee_denom).await?;
        let info = queries
            .account_info(&address)
            .await?
            .ok_or_else(|| SignerError::AccountNotFound {
                address: address.clone(),
            })?;
        let balance = queries.balance(&address, &params.fee_denom).await?;

        info!(
            %address,
            %chain_id,
            gas_price,
            account_number = info.account_number,
            sequence = info.sequence,
            balance = %balance,
            "wallet loaded"
        );

        Ok(Self {
            keypair,
            address,
            chain_id,
            gas_price,
            params,
            queries,
            account: Mutex::new(AccountState {
                account_number: info.account_number,
                sequence: info.sequence,
                balance,
            }),
            simulate_policy: RetryPolicy::new(SIMULATE_ATTEMPTS, SIMULATE_RETRY_DELAY),
        })
    }

    /// Chain id the signer binds transactions to.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Next sequence the signer will use.
    pub fn sequence(&self) -> u64 {
        self.account.lock().sequence
    }

    /// Balance as tracked locally.
    pub fn balance(&self) -> u128 {
        self.account.lock().balance
    }

    fn context(&self, state: &AccountState) -> TxContext<'_> {
        TxContext {
            keypair: &self.keypair,
            chain_id: &self.chain_id,
            account_number: state.account_number,
            sequence: state.sequence,
            fee_denom: &self.params.fee_denom,
        }
    }

    async fn estimate_gas(&self, dry_run: &[u8]) -> Result<u64, SignerError> {
        self.simulate_policy
            .run_classified(|attempt| async move {
                match self.queries.simulate(dry_run).await {
                    Ok(gas) => Ok(gas),
                    Err(e) if e.is_transient() => {
                        warn!(attempt, error = %e, "could not estimate gas, retrying");
                        Err(RetryDecision::Retry(e))
                    }
                    Err(e) => Err(RetryDecision::Abort(e)),
                }
            })
            .await
            .map_err(|e: RetryError<ChainError>| SignerError::GasEstimation {
                attempts: e.attempts(),
                last: e.into_inner(),
            })
    }
}

#[async_trait]
impl TxSigner for CosmosTxSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign(&self, message: &SubmissionMessage) -> Result<SignedTx, SignerError> {
        let latest = self.queries.latest_height().await?;
        let timeout_height = latest + TIMEOUT_HEIGHT_OFFSET;
        let any = payload_any(message, &self.keypair, &self.address)?;

        let state = *self.account.lock();
        let ctx = self.context(&state);

        let dry_run = build_tx(&ctx, any.clone(), timeout_height, FeeQuote::ZERO);
        let gas_used = self.estimate_gas(&dry_run).await?;
        let fee = compute_fee(gas_used, self.params.gas_adjustment, self.gas_price);

        debug!(
            kind = message.kind(),
            gas_used,
            gas_limit = fee.gas_limit,
            fee = %fee.amount,
            sequence = state.sequence,
            "transaction priced"
        );

        if fee.amount > state.balance {
            return Err(SignerError::InsufficientBalance {
                required: fee.amount,
                balance: state.balance,
            });
        }

        Ok(SignedTx {
            bytes: build_tx(&ctx, any, timeout_height, fee),
            sequence: state.sequence,
            gas_limit: fee.gas_limit,
            fee: fee.amount,
        })
    }

    fn record_broadcast(&self, tx: &SignedTx, result: &Result<TxHash, ChainError>) {
        let mut state = self.account.lock();
        match result {
            Ok(_) => {
                if state.sequence == tx.sequence {
                    state.sequence += 1;
                }
                state.balance = state.balance.saturating_sub(tx.fee);
            }
            Err(ChainError::SequenceMismatch { expected, .. }) => {
                warn!(
                    local = state.sequence,
                    expected, "account sequence out of sync, adopting chain value"
                );
                state.sequence = *expected;
            }
            Err(_) => {}
        }
    }
}
