//! # Node Runtime
//!
//! Wiring for the offchain node binary: configuration, startup checks, the
//! worker supervisor and shutdown handling.
//!
//! ## Startup Sequence
//!
//! 1. Parse the config document (`--config`, default `./config.json`)
//! 2. Initialize logging from the environment and the `debug` flag
//! 3. Resolve the document into [`GlobalConfig`] (fatal on any error)
//! 4. Check the API node and load the wallet
//! 5. Start one supervised [`TopicWorker`](oc_04_topic_worker::TopicWorker)
//!    per topic
//! 6. Wait for SIGINT/SIGTERM or for every worker to stop

#![warn(missing_docs)]

pub mod config;
pub mod runtime;
pub mod shutdown;
pub mod startup;
pub mod supervisor;

pub use config::{ChainParams, ConfigError, GlobalConfig, RawConfig, SupervisorConfig};
pub use runtime::NodeRuntime;
pub use shutdown::{wait_for_os_signal, ShutdownController, ShutdownSignal};
pub use startup::{bootstrap_wallet, StartupError};
pub use supervisor::{SupervisorHandle, TaskExit, WorkerSupervisor};
