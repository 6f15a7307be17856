//! # Ports Layer
//!
//! - [`ChainClient`]: the three operations a topic cycle needs
//! - [`ChainQueries`]: everything else (startup checks, preflight, signing)

pub mod outbound;

pub use outbound::*;
