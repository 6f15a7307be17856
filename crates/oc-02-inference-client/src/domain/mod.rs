//! # Domain Layer

pub mod errors;
pub mod value;

pub use errors::*;
pub use value::parse_inference_body;
