//! # Topic Worker Subsystem (oc-04)
//!
//! One [`TopicWorker`] per configured topic drives an endless cycle:
//!
//! ```text
//!            ┌──────────────────────────────────────────────────────┐
//!            ↓                                                      │
//! NonceWatcher ──Nonce──→ InferenceFetcher ──InferenceValue──→ Submitter
//!   (tick = nonce_fetch_freq,   (RetryPolicy: fetch_retries,       │ TxHash
//!    unbounded)                  fetch_retry_freq)                 ↓
//!                                                        ConfirmationPoller
//!                                                        (RetryPolicy: tx_check_*)
//! ```
//!
//! ## Failure Containment
//!
//! | Stage | Failure | Effect |
//! |-------|---------|--------|
//! | NonceWatcher | chain query error | logged, retried on next tick |
//! | InferenceFetcher | budget exhausted | nonce abandoned, no submission |
//! | Submitter | sign / broadcast error | single shot, cycle ends |
//! | ConfirmationPoller | explicit failure | stops immediately |
//! | ConfirmationPoller | budget exhausted | logged as unconfirmed |
//! | any | panic | caught per cycle, loop continues |
//!
//! ## Nonce Tracking
//!
//! A nonce is claimed in [`NonceTracker`] the moment it is observed, before
//! any later stage runs, so a failed cycle never re-emits the same window.
//! Each worker owns its tracker; nothing about nonces is shared across
//! topics.
//!
//! ## Account Sequence
//!
//! All workers of one wallet share a [`SubmissionLane`]. The submitter holds
//! it across sign → broadcast → record, which keeps account sequences
//! strictly increasing while every other stage runs fully in parallel.

#![warn(missing_docs)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{CycleError, NonceTracker, PreflightError, Stage};
pub use ports::SupervisedTask;
pub use service::{
    ConfirmationPoller, InferenceFetcher, NonceWatcher, Preflight, SubmissionLane, Submitter,
    TopicWorker, WatcherState, WorkerDeps,
};
