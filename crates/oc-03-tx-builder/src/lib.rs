//! # Transaction Builder Subsystem (oc-03)
//!
//! Turns a [`SubmissionMessage`](shared_types::SubmissionMessage) into a
//! signed, encoded Cosmos SDK transaction.
//!
//! ## Signing Pipeline
//!
//! ```text
//! SubmissionMessage
//!     │  payload_any()          InsertWorkerPayloadRequest | RegisterRequest
//!     ↓
//! Any ──→ TxBody(timeout = latest + 50)
//!     │  build_tx(fee = 0)      dry run
//!     ↓
//! simulate ──→ gas_used ──→ FeeQuote { gas_limit, amount }
//!     │  build_tx(fee)          SIGN_MODE_DIRECT over SignDoc
//!     ↓
//! SignedTx { bytes, sequence, gas_limit, fee }
//! ```
//!
//! ## Account Sequence
//!
//! [`CosmosTxSigner`] owns the wallet's account number, sequence and known
//! balance. Callers must serialize `sign → broadcast → record_broadcast` for
//! one wallet; the topic worker does this with its submission lane.

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{CosmosTxSigner, MockTxSigner, SignerParams};
pub use domain::{
    build_tx, compute_fee, payload_any, FeeQuote, SignerError, TxContext, DEFAULT_FEE_DENOM,
    DEFAULT_GAS_ADJUSTMENT, TIMEOUT_HEIGHT_OFFSET,
};
pub use ports::TxSigner;
