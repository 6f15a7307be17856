//! # Ports Layer

use async_trait::async_trait;
use shared_types::TopicId;

use crate::domain::InferenceError;

/// Source of inference values.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Fetch the current prediction for `topic_id` from `url`.
    ///
    /// Returns the validated decimal text.
    async fn fetch(&self, topic_id: TopicId, url: &str) -> Result<String, InferenceError>;
}
