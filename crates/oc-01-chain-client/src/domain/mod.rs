//! # Domain Layer
//!
//! Error taxonomy and LCD response parsing. No I/O lives here; the adapter
//! hands raw JSON bodies to the `wire` functions.

pub mod errors;
pub mod wire;

pub use errors::*;
pub use wire::AccountInfo;
