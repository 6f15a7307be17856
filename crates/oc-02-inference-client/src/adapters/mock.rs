//! Scripted inference source.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use shared_types::TopicId;

use crate::domain::InferenceError;
use crate::ports::InferenceClient;

/// Answers from a queue; once drained, repeats the default answer.
#[derive(Debug)]
pub struct MockInferenceClient {
    script: Mutex<VecDeque<Result<String, InferenceError>>>,
    default: Mutex<Result<String, InferenceError>>,
    calls: Mutex<Vec<(TopicId, String)>>,
}

impl MockInferenceClient {
    /// Always answer `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Mutex::new(Ok(value.into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: InferenceError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Mutex::new(Err(error)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue one answer ahead of the default.
    pub fn push(&self, result: Result<String, InferenceError>) {
        self.script.lock().push_back(result);
    }

    /// Number of `fetch` calls.
    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// `(topic, url)` of every `fetch` call.
    pub fn requests(&self) -> Vec<(TopicId, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn fetch(&self, topic_id: TopicId, url: &str) -> Result<String, InferenceError> {
        self.calls.lock().push((topic_id, url.to_string()));
        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| self.default.lock().clone())
    }
}
