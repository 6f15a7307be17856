//! # Chain Client Subsystem (oc-01)
//!
//! The offchain node's only view of the chain. It answers three questions
//! for the per-topic cycle and a handful more for startup and signing:
//!
//! | Port | Operation | LCD route |
//! |------|-----------|-----------|
//! | [`ChainClient`] | `get_open_nonce` | `GET /emissions/v9/unfulfilled_worker_nonces/{topic}` |
//! | [`ChainClient`] | `submit_tx` | `POST /cosmos/tx/v1beta1/txs` |
//! | [`ChainClient`] | `get_tx_status` | `GET /cosmos/tx/v1beta1/txs/{hash}` |
//! | [`ChainQueries`] | `chain_id`, `is_syncing`, `latest_height` | `/cosmos/base/tendermint/v1beta1/*` |
//! | [`ChainQueries`] | `gas_price` | `GET /feemarket/v1/gas_price/{denom}` |
//! | [`ChainQueries`] | `account_info`, `balance` | `/cosmos/auth`, `/cosmos/bank` |
//! | [`ChainQueries`] | `simulate` | `POST /cosmos/tx/v1beta1/simulate` |
//! | [`ChainQueries`] | topic / worker status | `/emissions/v9/*` |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): error taxonomy and pure response parsing
//! - **Ports Layer** (`ports/`): `ChainClient` and `ChainQueries` traits
//! - **Adapters Layer** (`adapters/`): `LcdClient` (reqwest) and `MockChainClient`
//!
//! ## Error Classification
//!
//! Transport failures, throttling/5xx statuses and malformed bodies are
//! transient ([`ChainError::is_transient`]). A broadcast rejected by the
//! chain is not; callers must not blindly resubmit it.

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{LcdClient, MockChainClient, LCD_REQUEST_TIMEOUT};
pub use domain::{AccountInfo, ChainError, CODE_NOT_FOUND, CODE_SEQUENCE_MISMATCH};
pub use ports::{ChainClient, ChainQueries};
