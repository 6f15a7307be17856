//! # Node Telemetry
//!
//! Log setup for the offchain node: one `tracing-subscriber` registry with an
//! env filter and either a human-readable or a JSON formatter on stdout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use node_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env(raw_config.debug);
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OC_LOG_LEVEL` | unset | Filter directive, highest precedence |
//! | `RUST_LOG` | unset | Filter directive when `OC_LOG_LEVEL` is unset |
//! | `OC_JSON_LOGS` | `true` in containers | JSON lines instead of pretty output |
//!
//! Without either variable the config document's `debug` flag selects
//! `debug` or `info`.

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{TelemetryConfig, QUIET_DEPENDENCIES};
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive does not parse.
    #[error("Invalid log filter `{directive}`: {reason}")]
    Filter {
        /// Offending directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Log a pipeline-stage event for one topic with standard fields.
///
/// ```rust,ignore
/// log_stage!(warn, "fetch", topic_id, "inference fetch exhausted", nonce = 42, attempts = 5);
/// ```
#[macro_export]
macro_rules! log_stage {
    ($level:ident, $stage:expr, $topic_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            stage = $stage,
            topic_id = $topic_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $stage:expr, $topic_id:expr, $msg:expr, $tx_hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            stage = $stage,
            topic_id = $topic_id,
            tx_hash = %$tx_hash,
            $($($field)*,)?
            $msg
        )
    };
}
