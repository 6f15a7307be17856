//! # Adapters Layer

pub mod cosmos;
pub mod mock;

pub use cosmos::{CosmosTxSigner, SignerParams};
pub use mock::MockTxSigner;
