// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted image provider for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use confab_core::ConfabError;
use confab_core::traits::ImageGenerator;

/// Data URL returned once a mock's script runs out.
pub const DEFAULT_DATA_URL: &str = "data:image/png;base64,bW9jaw==";

/// Scripted [`ImageGenerator`] with pre-configured outcomes.
///
/// Outcomes are popped in order; once the script runs out, every further
/// call succeeds with [`DEFAULT_DATA_URL`]. Prompts are recorded for
/// assertions.
#[derive(Debug, Clone)]
pub struct MockImageGenerator {
    outcomes: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock that answers with `data_urls` in order.
    pub fn with_data_urls(data_urls: Vec<String>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(data_urls.into_iter().map(Ok).collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful data URL.
    pub async fn add_data_url(&self, data_url: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(data_url.into()));
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
            .unwrap_or_else(|| Ok(DEFAULT_DATA_URL.to_string()))
    }
}

impl Default for MockImageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    fn name(&self) -> &str {
        "mock-image"
    }

    async fn synthesize(&self, prompt: &str) -> Result<String, ConfabError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.next_outcome()
            .await
            .map_err(|message| ConfabError::Provider {
                message,
                source: None,
            })
    }
}
