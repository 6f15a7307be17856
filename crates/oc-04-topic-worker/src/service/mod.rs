//! # Service Layer
//!
//! Stage services composed by [`TopicWorker`].

mod fetcher;
mod poller;
mod preflight;
mod submitter;
mod watcher;
mod worker;

pub use fetcher::InferenceFetcher;
pub use poller::ConfirmationPoller;
pub use preflight::Preflight;
pub use submitter::{SubmissionLane, Submitter};
pub use watcher::{NonceWatcher, WatcherState};
pub use worker::{TopicWorker, WorkerDeps};
