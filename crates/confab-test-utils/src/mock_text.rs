// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted text provider for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use confab_core::ConfabError;
use confab_core::traits::TextGenerator;

/// Scripted [`TextGenerator`] with pre-configured outcomes.
///
/// Outcomes are popped in order; once the script runs out, every further
/// call succeeds with `"mock reply"`. Prompts are recorded for assertions.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    outcomes: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock that answers with `replies` in order.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(replies.into_iter().map(Ok).collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub async fn add_reply(&self, reply: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(reply.into()));
    }

    /// Queues a failure with the given provider error message.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.outcomes.lock().await.push_back(Err(message.into()));
    }

    /// Prompts seen so far, in call order.
    pub async fn seen_prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    async fn next_outcome(&self) -> Result<String, String> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock reply".to_string()))
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    fn name(&self) -> &str {
        "mock-text"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ConfabError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.next_outcome()
            .await
            .map_err(|message| ConfabError::Provider {
                message,
                source: None,
            })
    }
}
