//! # Domain Layer
//!
//! Stage names, error taxonomy and the per-topic nonce watermark.

pub mod errors;
pub mod stage;
pub mod tracker;

pub use errors::*;
pub use stage::Stage;
pub use tracker::NonceTracker;
