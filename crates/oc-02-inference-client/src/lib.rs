//! # Inference Client Subsystem (oc-02)
//!
//! `GET inference_url` → trimmed body → validated decimal string.
//!
//! The endpoint is user-provided and usually a small model server running
//! next to the node. Its answer must be a bare number (`"2731.55"`,
//! `"-0.013"`); anything else is an [`InferenceError`]. Every error is
//! retryable by the caller's fetch budget.

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{HttpInferenceClient, MockInferenceClient, INFERENCE_REQUEST_TIMEOUT};
pub use domain::{parse_inference_body, InferenceError};
pub use ports::InferenceClient;
