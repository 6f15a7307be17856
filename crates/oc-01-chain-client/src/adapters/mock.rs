//! Scripted in-memory chain.
//!
//! Every scripted queue is consumed front to back; once empty, the
//! corresponding default answer is returned forever.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use shared_types::{SignedTx, TopicId, TxHash, TxStatus};

use crate::domain::{AccountInfo, ChainError};
use crate::ports::{ChainClient, ChainQueries};

#[derive(Debug)]
struct MockState {
    nonces: VecDeque<Result<Option<u64>, ChainError>>,
    default_nonce: Option<u64>,
    broadcasts: VecDeque<Result<TxHash, ChainError>>,
    statuses: VecDeque<Result<TxStatus, ChainError>>,
    default_status: TxStatus,
    simulations: VecDeque<Result<u64, ChainError>>,
    default_gas_used: u64,
    query_failures: VecDeque<ChainError>,
    topic_activity: VecDeque<bool>,

    chain_id: String,
    syncing: bool,
    gas_price: f64,
    latest_height: u64,
    account: Option<AccountInfo>,
    balance: u128,
    topic_active: bool,
    whitelist_enabled: bool,
    whitelisted: bool,
    registered: bool,

    submitted: Vec<SignedTx>,
    nonce_calls: u32,
    status_calls: u32,
    simulate_calls: u32,
    query_calls: u32,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            nonces: VecDeque::new(),
            default_nonce: None,
            broadcasts: VecDeque::new(),
            statuses: VecDeque::new(),
            default_status: TxStatus::Included { height: 1 },
            simulations: VecDeque::new(),
            default_gas_used: 100_000,
            query_failures: VecDeque::new(),
            topic_activity: VecDeque::new(),
            chain_id: "allora-testnet-1".to_string(),
            syncing: false,
            gas_price: 10.0,
            latest_height: 1_000,
            account: Some(AccountInfo {
                account_number: 7,
                sequence: 0,
            }),
            balance: 1_000_000_000_000,
            topic_active: true,
            whitelist_enabled: false,
            whitelisted: false,
            registered: true,
            submitted: Vec::new(),
            nonce_calls: 0,
            status_calls: 0,
            simulate_calls: 0,
            query_calls: 0,
        }
    }
}

/// Mock chain implementing both [`ChainClient`] and [`ChainQueries`].
#[derive(Debug, Default)]
pub struct MockChainClient {
    state: Mutex<MockState>,
}

impl MockChainClient {
    /// Healthy chain: not syncing, funded account, active topics, worker
    /// already registered, no open nonce, every tx included.
    pub fn new() -> Self {
        Self::default()
    }

    // === Scripting ===

    /// Queue one answer for `get_open_nonce`.
    pub fn push_nonce(&self, result: Result<Option<u64>, ChainError>) {
        self.state.lock().nonces.push_back(result);
    }

    /// Answer returned once the nonce queue is empty.
    pub fn set_open_nonce(&self, nonce: Option<u64>) {
        self.state.lock().default_nonce = nonce;
    }

    /// Queue one broadcast answer; unscripted broadcasts succeed.
    pub fn push_broadcast(&self, result: Result<TxHash, ChainError>) {
        self.state.lock().broadcasts.push_back(result);
    }

    /// Queue one `get_tx_status` answer.
    pub fn push_status(&self, result: Result<TxStatus, ChainError>) {
        self.state.lock().statuses.push_back(result);
    }

    /// Status returned once the status queue is empty.
    pub fn set_default_status(&self, status: TxStatus) {
        self.state.lock().default_status = status;
    }

    /// Queue one `simulate` answer.
    pub fn push_simulation(&self, result: Result<u64, ChainError>) {
        self.state.lock().simulations.push_back(result);
    }

    /// Fail the next [`ChainQueries`] call with `error`.
    pub fn push_query_failure(&self, error: ChainError) {
        self.state.lock().query_failures.push_back(error);
    }

    /// Node sync flag.
    pub fn set_syncing(&self, syncing: bool) {
        self.state.lock().syncing = syncing;
    }

    /// Fee-market gas price.
    pub fn set_gas_price(&self, price: f64) {
        self.state.lock().gas_price = price;
    }

    /// Wallet account; `None` models an unfunded address.
    pub fn set_account(&self, account: Option<AccountInfo>) {
        self.state.lock().account = account;
    }

    /// Wallet balance in the fee denomination.
    pub fn set_balance(&self, balance: u128) {
        self.state.lock().balance = balance;
    }

    /// Topic activity flag.
    pub fn set_topic_active(&self, active: bool) {
        self.state.lock().topic_active = active;
    }

    /// Queue one `is_topic_active` answer ahead of the activity flag.
    pub fn push_topic_active(&self, active: bool) {
        self.state.lock().topic_activity.push_back(active);
    }

    /// Whitelist mode and membership of the wallet.
    pub fn set_whitelist(&self, enabled: bool, member: bool) {
        let mut state = self.state.lock();
        state.whitelist_enabled = enabled;
        state.whitelisted = member;
    }

    /// Worker registration flag.
    pub fn set_registered(&self, registered: bool) {
        self.state.lock().registered = registered;
    }

    // === Inspection ===

    /// Every transaction passed to `submit_tx`, in order.
    pub fn submitted(&self) -> Vec<SignedTx> {
        self.state.lock().submitted.clone()
    }

    /// Number of `submit_tx` calls.
    pub fn submit_calls(&self) -> usize {
        self.state.lock().submitted.len()
    }

    /// Number of `get_open_nonce` calls.
    pub fn nonce_calls(&self) -> u32 {
        self.state.lock().nonce_calls
    }

    /// Number of `get_tx_status` calls.
    pub fn status_calls(&self) -> u32 {
        self.state.lock().status_calls
    }

    /// Number of `simulate` calls.
    pub fn simulate_calls(&self) -> u32 {
        self.state.lock().simulate_calls
    }

    /// Number of [`ChainQueries`] calls of any kind.
    pub fn query_calls(&self) -> u32 {
        self.state.lock().query_calls
    }

    fn query<T>(&self, answer: impl FnOnce(&mut MockState) -> T) -> Result<T, ChainError> {
        let mut state = self.state.lock();
        state.query_calls += 1;
        if let Some(error) = state.query_failures.pop_front() {
            return Err(error);
        }
        Ok(answer(&mut state))
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_open_nonce(&self, _topic_id: TopicId) -> Result<Option<u64>, ChainError> {
        let mut state = self.state.lock();
        state.nonce_calls += 1;
        let fallback = state.default_nonce;
        state.nonces.pop_front().unwrap_or(Ok(fallback))
    }

    async fn submit_tx(&self, tx: &SignedTx) -> Result<TxHash, ChainError> {
        let mut state = self.state.lock();
        state.submitted.push(tx.clone());
        let count = state.submitted.len();
        state
            .broadcasts
            .pop_front()
            .unwrap_or_else(|| Ok(TxHash(format!("{count:064X}"))))
    }

    async fn get_tx_status(&self, _tx_hash: &TxHash) -> Result<TxStatus, ChainError> {
        let mut state = self.state.lock();
        state.status_calls += 1;
        let fallback = state.default_status.clone();
        state.statuses.pop_front().unwrap_or(Ok(fallback))
    }
}

#[async_trait]
impl ChainQueries for MockChainClient {
    async fn chain_id(&self) -> Result<String, ChainError> {
        self.query(|s| s.chain_id.clone())
    }

    async fn is_syncing(&self) -> Result<bool, ChainError> {
        self.query(|s| s.syncing)
    }

    async fn gas_price(&self, _denom: &str) -> Result<f64, ChainError> {
        self.query(|s| s.gas_price)
    }

    async fn latest_height(&self) -> Result<u64, ChainError> {
        self.query(|s| s.latest_height)
    }

    async fn account_info(&self, _address: &str) -> Result<Option<AccountInfo>, ChainError> {
        self.query(|s| s.account)
    }

    async fn balance(&self, _address: &str, _denom: &str) -> Result<u128, ChainError> {
        self.query(|s| s.balance)
    }

    async fn simulate(&self, _tx_bytes: &[u8]) -> Result<u64, ChainError> {
        let mut state = self.state.lock();
        state.simulate_calls += 1;
        let fallback = state.default_gas_used;
        state.simulations.pop_front().unwrap_or(Ok(fallback))
    }

    async fn is_topic_active(&self, _topic_id: TopicId) -> Result<bool, ChainError> {
        self.query(|s| s.topic_activity.pop_front().unwrap_or(s.topic_active))
    }

    async fn is_topic_whitelist_enabled(&self, _topic_id: TopicId) -> Result<bool, ChainError> {
        self.query(|s| s.whitelist_enabled)
    }

    async fn is_whitelisted_for(
        &self,
        _topic_id: TopicId,
        _address: &str,
    ) -> Result<bool, ChainError> {
        self.query(|s| s.whitelisted)
    }

    async fn is_registered_for(
        &self,
        _topic_id: TopicId,
        _address: &str,
    ) -> Result<bool, ChainError> {
        self.query(|s| s.registered)
    }
}
