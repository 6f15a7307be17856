//! # Ports Layer
//!
//! The inbound port the supervisor drives.

pub mod inbound;

pub use inbound::*;
