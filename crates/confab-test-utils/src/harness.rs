// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration test harness wiring a real store to scripted providers.
//!
//! Builds a [`ChatService`] backed by a SQLite database in a temp
//! directory, with [`MockTextGenerator`] / [`MockImageGenerator`] standing
//! in for the real providers. The database lives as long as the harness.

use std::sync::Arc;

use confab_chat::ChatService;
use confab_config::model::StorageConfig;
use confab_core::ConfabError;
use confab_core::traits::{ImageGenerator, TextGenerator};
use confab_core::types::{ChatTurn, UserIdentity};
use confab_storage::ChatStore;

use crate::mock_image::MockImageGenerator;
use crate::mock_text::MockTextGenerator;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    text_outcomes: Vec<Result<String, String>>,
    image_outcomes: Vec<Result<String, String>>,
    text_enabled: bool,
    image_enabled: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            text_outcomes: Vec::new(),
            image_outcomes: Vec::new(),
            text_enabled: true,
            image_enabled: true,
        }
    }

    /// Queues a scripted text reply.
    pub fn with_text_reply(mut self, reply: impl Into<String>) -> Self {
        self.text_outcomes.push(Ok(reply.into()));
        self
    }

    /// Queues a scripted text provider failure.
    pub fn with_text_failure(mut self, message: impl Into<String>) -> Self {
        self.text_outcomes.push(Err(message.into()));
        self
    }

    /// Queues a scripted image data URL.
    pub fn with_image_reply(mut self, data_url: impl Into<String>) -> Self {
        self.image_outcomes.push(Ok(data_url.into()));
        self
    }

    /// Queues a scripted image provider failure.
    pub fn with_image_failure(mut self, message: impl Into<String>) -> Self {
        self.image_outcomes.push(Err(message.into()));
        self
    }

    /// Builds the service with no text provider, as when no Gemini key is
    /// configured.
    pub fn without_text_provider(mut self) -> Self {
        self.text_enabled = false;
        self
    }

    /// Builds the service with no image provider, as when no Hugging Face
    /// key is configured.
    pub fn without_image_provider(mut self) -> Self {
        self.image_enabled = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, ConfabError> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| ConfabError::Internal(format!("failed to create temp dir: {e}")))?;

        let storage = StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
            wal_mode: true,
        };
        let store = Arc::new(ChatStore::open(&storage).await?);

        let mock_text = if self.text_enabled {
            let mock = Arc::new(MockTextGenerator::new());
            for outcome in self.text_outcomes {
                match outcome {
                    Ok(reply) => mock.add_reply(reply).await,
                    Err(message) => mock.add_failure(message).await,
                }
            }
            Some(mock)
        } else {
            None
        };

        let mock_image = if self.image_enabled {
            let mock = Arc::new(MockImageGenerator::new());
            for outcome in self.image_outcomes {
                match outcome {
                    Ok(data_url) => mock.add_data_url(data_url).await,
                    Err(message) => mock.add_failure(message).await,
                }
            }
            Some(mock)
        } else {
            None
        };

        let chat = Arc::new(ChatService::new(
            store.clone(),
            mock_text.clone().map(|m| m as Arc<dyn TextGenerator>),
            mock_image.clone().map(|m| m as Arc<dyn ImageGenerator>),
        ));

        Ok(TestHarness {
            chat,
            store,
            mock_text,
            mock_image,
            _temp_dir: temp_dir,
        })
    }
}

/// A chat service with scripted providers and a throwaway database.
pub struct TestHarness {
    pub chat: Arc<ChatService>,
    pub store: Arc<ChatStore>,
    pub mock_text: Option<Arc<MockTextGenerator>>,
    pub mock_image: Option<Arc<MockImageGenerator>>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Submits `input` as `user_id` and returns the persisted model turn.
    pub async fn send(&self, user_id: &str, input: &str) -> Result<ChatTurn, ConfabError> {
        self.chat.submit(&UserIdentity::new(user_id), input).await
    }

    /// Returns `user_id`'s history, oldest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<ChatTurn>, ConfabError> {
        self.chat.history(&UserIdentity::new(user_id)).await
    }
}
