//! # Shared Types Crate
//!
//! Domain entities shared by the offchain node subsystems, and the
//! fixed-delay [`RetryPolicy`] every retrying operation is built on.
//!
//! ## Data Flow (one cycle per topic)
//!
//! ```text
//! chain state ──→ Nonce ──→ InferenceValue ──→ SubmissionMessage
//!                                                   │
//!                                                   ↓
//!                     ConfirmationResult ←── TxHash ←── SignedTx
//! ```
//!
//! No entity here carries state across cycles; the only cross-cycle value
//! (the last handled nonce of a topic) is owned by the topic worker.

pub mod config;
pub mod entities;
pub mod retry;

pub use config::*;
pub use entities::*;
pub use retry::{RetryDecision, RetryError, RetryPolicy};
