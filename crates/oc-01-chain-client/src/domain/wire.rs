//! # LCD Wire Parsing
//!
//! The gRPC gateway renders 64-bit integers as JSON strings, and reports
//! failures as `{"code": n, "message": "..."}` bodies, often with a 2xx or
//! 404 status. Everything here works on already-decoded JSON values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use shared_types::{TxHash, TxStatus};

use super::errors::{ChainError, CODE_NOT_FOUND, CODE_SEQUENCE_MISMATCH};

/// Signing-relevant account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    /// Account number assigned at first funding.
    pub account_number: u64,
    /// Next expected transaction sequence.
    pub sequence: u64,
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn u128_from_string<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: u32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    default_node_info: DefaultNodeInfo,
}

#[derive(Debug, Deserialize)]
struct DefaultNodeInfo {
    network: String,
}

#[derive(Debug, Deserialize)]
struct SyncingResponse {
    syncing: bool,
}

#[derive(Debug, Deserialize)]
struct GasPriceResponse {
    price: DecCoin,
}

#[derive(Debug, Deserialize)]
struct DecCoin {
    amount: String,
}

#[derive(Debug, Deserialize)]
struct LatestBlockResponse {
    block: Block,
}

#[derive(Debug, Deserialize)]
struct Block {
    header: BlockHeader,
}

#[derive(Debug, Deserialize)]
struct BlockHeader {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    height: u64,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    info: RawAccountInfo,
}

#[derive(Debug, Deserialize)]
struct RawAccountInfo {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    account_number: u64,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    sequence: u64,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Coin,
}

#[derive(Debug, Deserialize)]
struct Coin {
    #[serde(deserialize_with = "u128_from_string")]
    amount: u128,
}

#[derive(Debug, Deserialize)]
struct SimulateResponse {
    gas_info: GasInfo,
}

#[derive(Debug, Deserialize)]
struct GasInfo {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    gas_used: u64,
}

#[derive(Debug, Deserialize)]
struct TxEnvelope {
    tx_response: TxResponse,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default, deserialize_with = "u64_from_string_or_number")]
    height: u64,
    #[serde(default)]
    txhash: String,
    code: u32,
    #[serde(default)]
    raw_log: String,
}

#[derive(Debug, Deserialize)]
struct NoncesResponse {
    nonces: NonceList,
}

#[derive(Debug, Deserialize)]
struct NonceList {
    #[serde(default)]
    nonces: Vec<RawNonce>,
}

#[derive(Debug, Deserialize)]
struct RawNonce {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    block_height: u64,
}

// =============================================================================
// HELPERS
// =============================================================================

fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Result<T, ChainError> {
    serde_json::from_value(body).map_err(|e| ChainError::MalformedResponse(format!("{what}: {e}")))
}

/// `{"code": n, "message": ...}` bodies, if this is one.
fn error_body(body: &Value) -> Option<ErrorBody> {
    if body.get("code").is_some() && body.get("message").is_some() {
        serde_json::from_value(body.clone()).ok()
    } else {
        None
    }
}

fn reject_error_body(body: &Value) -> Result<(), ChainError> {
    match error_body(body) {
        Some(err) => Err(ChainError::Rejected {
            code: err.code,
            raw_log: err.message,
        }),
        None => Ok(()),
    }
}

/// Sequence the chain expects, from an "account sequence mismatch" log.
pub fn parse_expected_sequence(raw_log: &str) -> Option<u64> {
    let (_, tail) = raw_log.split_once("expected ")?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// =============================================================================
// PARSERS
// =============================================================================

/// `node_info` → chain id.
pub fn parse_chain_id(body: Value) -> Result<String, ChainError> {
    reject_error_body(&body)?;
    let resp: NodeInfoResponse = decode(body, "node_info")?;
    Ok(resp.default_node_info.network)
}

/// `syncing` → flag.
pub fn parse_syncing(body: Value) -> Result<bool, ChainError> {
    reject_error_body(&body)?;
    let resp: SyncingResponse = decode(body, "syncing")?;
    Ok(resp.syncing)
}

/// `gas_price` → price per gas unit.
pub fn parse_gas_price(body: Value) -> Result<f64, ChainError> {
    reject_error_body(&body)?;
    let resp: GasPriceResponse = decode(body, "gas_price")?;
    let price: f64 = resp
        .price
        .amount
        .trim()
        .parse()
        .map_err(|_| ChainError::MalformedResponse(format!("gas price `{}`", resp.price.amount)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(ChainError::MalformedResponse(format!("gas price {price}")));
    }
    Ok(price)
}

/// `blocks/latest` → height.
pub fn parse_latest_height(body: Value) -> Result<u64, ChainError> {
    reject_error_body(&body)?;
    let resp: LatestBlockResponse = decode(body, "blocks/latest")?;
    Ok(resp.block.header.height)
}

/// `account_info` → account state; `None` when the account does not exist.
pub fn parse_account_info(body: Value) -> Result<Option<AccountInfo>, ChainError> {
    if let Some(err) = error_body(&body) {
        if err.code == CODE_NOT_FOUND {
            return Ok(None);
        }
        return Err(ChainError::Rejected {
            code: err.code,
            raw_log: err.message,
        });
    }
    let resp: AccountInfoResponse = decode(body, "account_info")?;
    Ok(Some(AccountInfo {
        account_number: resp.info.account_number,
        sequence: resp.info.sequence,
    }))
}

/// `balances/{addr}/by_denom` → amount.
pub fn parse_balance(body: Value) -> Result<u128, ChainError> {
    reject_error_body(&body)?;
    let resp: BalanceResponse = decode(body, "balance")?;
    Ok(resp.balance.amount)
}

/// `simulate` → gas used.
pub fn parse_simulate(body: Value) -> Result<u64, ChainError> {
    reject_error_body(&body)?;
    let resp: SimulateResponse = decode(body, "simulate")?;
    Ok(resp.gas_info.gas_used)
}

/// Broadcast response → hash of the accepted transaction.
pub fn parse_broadcast(body: Value) -> Result<TxHash, ChainError> {
    reject_error_body(&body)?;
    let resp: TxEnvelope = decode(body, "broadcast")?;
    let tx = resp.tx_response;

    match tx.code {
        0 if tx.txhash.is_empty() => Err(ChainError::MalformedResponse(
            "broadcast: empty txhash".to_string(),
        )),
        0 => Ok(TxHash(tx.txhash)),
        CODE_SEQUENCE_MISMATCH => match parse_expected_sequence(&tx.raw_log) {
            Some(expected) => Err(ChainError::SequenceMismatch {
                expected,
                raw_log: tx.raw_log,
            }),
            None => Err(ChainError::Rejected {
                code: tx.code,
                raw_log: tx.raw_log,
            }),
        },
        code => Err(ChainError::Rejected {
            code,
            raw_log: tx.raw_log,
        }),
    }
}

/// Transaction lookup → status.
pub fn parse_tx_status(body: Value) -> Result<TxStatus, ChainError> {
    if body.get("tx_response").is_some() {
        let resp: TxEnvelope = decode(body, "tx status")?;
        let tx = resp.tx_response;
        return Ok(if tx.code == 0 {
            TxStatus::Included { height: tx.height }
        } else {
            TxStatus::Failed {
                code: tx.code,
                raw_log: tx.raw_log,
            }
        });
    }

    match error_body(&body) {
        Some(err) if err.code == CODE_NOT_FOUND => Ok(TxStatus::NotFound),
        Some(err) => Err(ChainError::Rejected {
            code: err.code,
            raw_log: err.message,
        }),
        None => Err(ChainError::MalformedResponse(
            "tx status: neither tx_response nor error code".to_string(),
        )),
    }
}

/// `unfulfilled_worker_nonces` → first open window, if any.
pub fn parse_open_nonce(body: Value) -> Result<Option<u64>, ChainError> {
    reject_error_body(&body)?;
    let resp: NoncesResponse = decode(body, "unfulfilled_worker_nonces")?;
    Ok(resp.nonces.nonces.first().map(|n| n.block_height))
}

/// Boolean emissions query (`is_active`, `is_registered`, ...).
pub fn parse_flag(body: Value, field: &str) -> Result<bool, ChainError> {
    reject_error_body(&body)?;
    body.get(field)
        .and_then(Value::as_bool)
        .ok_or_else(|| ChainError::MalformedResponse(format!("missing boolean `{field}`")))
}
