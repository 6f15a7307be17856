//! # Domain Errors

use thiserror::Error;

/// Failures fetching an inference value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// Connection, timeout or body read failure.
    #[error("inference endpoint unreachable: {0}")]
    Transport(String),

    /// Non-2xx answer.
    #[error("inference endpoint answered HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// 2xx answer with a blank body.
    #[error("inference endpoint returned an empty body")]
    EmptyBody,

    /// Body is not a finite decimal number.
    #[error("inference value `{0}` is not a finite number")]
    NotNumeric(String),
}
