//! # Domain Layer
//!
//! Pure message assembly and fee math; no I/O.

pub mod builder;
pub mod errors;
pub mod fee;
pub mod proto;

pub use builder::*;
pub use errors::*;
pub use fee::*;
