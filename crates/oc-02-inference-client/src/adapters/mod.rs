//! # Adapters Layer

pub mod http;
pub mod mock;

pub use http::{HttpInferenceClient, INFERENCE_REQUEST_TIMEOUT};
pub use mock::MockInferenceClient;
