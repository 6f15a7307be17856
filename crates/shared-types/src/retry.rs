//! # Retry Policy
//!
//! Bounded retry with a fixed inter-attempt delay.
//!
//! ## Semantics
//!
//! - The operation runs at most `max_attempts` times (never fewer than 1).
//! - The first success returns immediately; no delay follows it.
//! - Between two attempts the policy sleeps exactly `delay`; there is no
//!   sleep after the last attempt.
//! - An operation may mark a failure as terminal ([`RetryDecision::Abort`]),
//!   which stops the loop without consuming the remaining budget.
//!
//! The policy keeps no state between invocations. The nonce watcher polls
//! without a budget and does not use it.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

/// How a failed attempt should be treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision<E> {
    /// Consume one attempt and try again after the delay.
    Retry(E),
    /// Stop immediately.
    Abort(E),
}

/// Terminal failure of a retried operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts performed (equals the policy's budget).
        attempts: u32,
        /// Error of the final attempt.
        last: E,
    },
    /// An attempt failed with a terminal error.
    #[error("aborted on attempt {attempt}: {error}")]
    Aborted {
        /// 1-based attempt that aborted.
        attempt: u32,
        /// The terminal error.
        error: E,
    },
}

impl<E> RetryError<E> {
    /// Attempts performed before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            Self::Aborted { attempt, .. } => *attempt,
        }
    }

    /// The last error observed.
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Aborted { error, .. } => error,
        }
    }

    /// Borrow the last error observed.
    pub fn last_error(&self) -> &E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Aborted { error, .. } => error,
        }
    }
}

/// Fixed-delay bounded retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; a zero attempt budget is raised to one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `operation`, retrying every error.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_classified(|attempt| {
            let attempt_fut = operation(attempt);
            async move { attempt_fut.await.map_err(RetryDecision::Retry) }
        })
        .await
    }

    /// Run `operation`, letting it decide per failure whether to retry.
    pub async fn run_classified<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, RetryDecision<E>>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(RetryDecision::Abort(error)) => {
                    return Err(RetryError::Aborted { attempt, error });
                }
                Err(RetryDecision::Retry(error)) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }
                    trace!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
