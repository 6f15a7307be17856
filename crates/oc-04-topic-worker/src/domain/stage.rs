//! Pipeline stage labels used in logs and errors.

use std::fmt;

/// Stage of the per-topic pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Topic activity / whitelist / registration checks.
    Preflight,
    /// Polling for an open nonce.
    Watch,
    /// Fetching the inference value.
    Fetch,
    /// Signing and broadcasting.
    Submit,
    /// Polling for inclusion.
    Confirm,
}

impl Stage {
    /// Lower-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::Watch => "watch",
            Self::Fetch => "fetch",
            Self::Submit => "submit",
            Self::Confirm => "confirm",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
