//! # Shared Crypto - Wallet Credential Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Transaction and payload signing |
//! | `address` | SHA-256 → RIPEMD-160 → bech32 | Account address derivation |
//! | `hd` | BIP-39 seed → BIP-32 (HMAC-SHA512) | Mnemonic wallets |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalized signatures
//! - Secret key material is zeroized on drop
//!
//! The keypair is the only credential shared across topic workers, and it is
//! only ever read.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod ecdsa;
pub mod errors;
pub mod hd;

// Re-exports
pub use address::account_address;
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hd::COSMOS_HD_PATH;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
