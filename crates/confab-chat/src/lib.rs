// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat exchange service: authenticated prompt in, persisted reply out.
//!
//! [`ChatService`] wraps every generation in a persistence envelope. The
//! user's turn is stored first, then exactly one model turn is stored and
//! returned, whether generation succeeded, failed, or was never configured.
//! Inputs starting with `/imagine ` route to the image provider; everything
//! else routes to the text provider.

use std::sync::Arc;

use confab_core::ConfabError;
use confab_core::traits::{ImageGenerator, TextGenerator};
use confab_core::types::{ChatTurn, IMAGE_REPLY_PREFIX, TurnRole, UserIdentity, image_prompt};
use confab_storage::ChatStore;
use tracing::warn;

/// Fixed reply stored when text generation fails or is not configured.
pub const TEXT_FALLBACK_REPLY: &str =
    "Sorry, I could not generate a response right now. Please try again.";

/// Fixed reply stored when no image provider is configured.
pub const IMAGE_UNCONFIGURED_REPLY: &str =
    "Image generation is not configured (missing HUGGINGFACE_API_KEY).";

/// Reply stored when image generation fails, carrying the failure reason.
pub fn image_failure_reply(reason: &str) -> String {
    format!("Sorry, I could not generate an image right now. ({reason})")
}

/// Brokers chat exchanges between the store and the generation providers.
///
/// Either provider may be absent; the service then stores the matching
/// canned reply instead of calling out.
pub struct ChatService {
    store: Arc<ChatStore>,
    text: Option<Arc<dyn TextGenerator>>,
    image: Option<Arc<dyn ImageGenerator>>,
}

impl ChatService {
    /// Creates a service over the given store and providers.
    pub fn new(
        store: Arc<ChatStore>,
        text: Option<Arc<dyn TextGenerator>>,
        image: Option<Arc<dyn ImageGenerator>>,
    ) -> Self {
        Self { store, text, image }
    }

    /// Handles one user input and returns the stored model turn.
    ///
    /// The user turn is stored before any generation starts; a storage
    /// failure there aborts the exchange with no model turn written.
    /// Generation failures never abort: they are folded into the model
    /// turn as a fallback reply.
    pub async fn submit(
        &self,
        user: &UserIdentity,
        input: &str,
    ) -> Result<ChatTurn, ConfabError> {
        match image_prompt(input) {
            Some(prompt) => self.image_exchange(user, input, prompt).await,
            None => self.text_exchange(user, input).await,
        }
    }

    /// All stored turns for the user, oldest first.
    pub async fn history(&self, user: &UserIdentity) -> Result<Vec<ChatTurn>, ConfabError> {
        self.store.history(&user.subject).await
    }

    async fn text_exchange(
        &self,
        user: &UserIdentity,
        input: &str,
    ) -> Result<ChatTurn, ConfabError> {
        self.store
            .append_turn(&user.subject, TurnRole::User, input)
            .await?;

        let reply = match &self.text {
            Some(generator) => match generator.generate(input).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(provider = generator.name(), error = %e, "text generation failed, storing fallback reply");
                    TEXT_FALLBACK_REPLY.to_string()
                }
            },
            None => {
                warn!("no text provider configured, storing fallback reply");
                TEXT_FALLBACK_REPLY.to_string()
            }
        };

        self.store
            .append_turn(&user.subject, TurnRole::Model, &reply)
            .await
    }

    async fn image_exchange(
        &self,
        user: &UserIdentity,
        input: &str,
        prompt: &str,
    ) -> Result<ChatTurn, ConfabError> {
        // The stored user turn keeps the full command, prefix included.
        self.store
            .append_turn(&user.subject, TurnRole::User, input)
            .await?;

        let reply = match &self.image {
            Some(generator) => match generator.synthesize(prompt).await {
                Ok(data_url) => format!("{IMAGE_REPLY_PREFIX}{data_url}"),
                Err(e) => {
                    let reason = failure_reason(&e);
                    warn!(provider = generator.name(), reason = %reason, "image generation failed, storing failure reply");
                    image_failure_reply(&reason)
                }
            },
            None => IMAGE_UNCONFIGURED_REPLY.to_string(),
        };

        self.store
            .append_turn(&user.subject, TurnRole::Model, &reply)
            .await
    }
}

/// Short human-readable reason for a failed generation, used inside the
/// stored failure reply.
fn failure_reason(error: &ConfabError) -> String {
    match error {
        ConfabError::Provider { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use async_trait::async_trait;
    use confab_config::model::StorageConfig;
    use tokio::sync::Mutex;

    struct ScriptedText {
        outcomes: Mutex<VecDeque<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedText {
        fn new(outcomes: Vec<Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(VecDeque::from(outcomes)),
                prompts: Mutex::new(Vec::new()),
            })
        }

        async fn seen_prompts(&self) -> Vec<String> {
            self.prompts.lock().await.clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedText {
        fn name(&self) -> &str {
            "scripted-text"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ConfabError> {
            self.prompts.lock().await.push(prompt.to_string());
            match self.outcomes.lock().await.pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(ConfabError::Provider {
                    message,
                    source: None,
                }),
                None => Ok("scripted reply".to_string()),
            }
        }
    }

    struct ScriptedImage {
        outcomes: Mutex<VecDeque<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedImage {
        fn new(outcomes: Vec<Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(VecDeque::from(outcomes)),
                prompts: Mutex::new(Vec::new()),
            })
        }

        async fn seen_prompts(&self) -> Vec<String> {
            self.prompts.lock().await.clone()
        }
    }

    #[async_trait]
    impl ImageGenerator for ScriptedImage {
        fn name(&self) -> &str {
            "scripted-image"
        }

        async fn synthesize(&self, prompt: &str) -> Result<String, ConfabError> {
            self.prompts.lock().await.push(prompt.to_string());
            match self.outcomes.lock().await.pop_front() {
                Some(Ok(url)) => Ok(url),
                Some(Err(message)) => Err(ConfabError::Provider {
                    message,
                    source: None,
                }),
                None => Ok("data:image/png;base64,bW9jaw==".to_string()),
            }
        }
    }

    async fn test_service(
        text: Option<Arc<dyn TextGenerator>>,
        image: Option<Arc<dyn ImageGenerator>>,
    ) -> (ChatService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("chat.db").to_string_lossy().to_string(),
            wal_mode: true,
        };
        let store = Arc::new(ChatStore::open(&config).await.unwrap());
        (ChatService::new(store, text, image), dir)
    }

    fn user(subject: &str) -> UserIdentity {
        UserIdentity::new(subject)
    }

    #[tokio::test]
    async fn text_exchange_stores_user_then_model() {
        let text = ScriptedText::new(vec![Ok("The sky scatters blue light.".into())]);
        let (service, _dir) = test_service(Some(text), None).await;

        let turn = service
            .submit(&user("alice"), "why is the sky blue?")
            .await
            .unwrap();
        assert_eq!(turn.role, TurnRole::Model);
        assert_eq!(turn.content, "The sky scatters blue light.");

        let history = service.history(&user("alice")).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, TurnRole::User);
        assert_eq!(history[0].content, "why is the sky blue?");
        assert_eq!(history[1].role, TurnRole::Model);
        assert_eq!(history[1].id, turn.id);
    }

    #[tokio::test]
    async fn text_failure_stores_fallback_reply() {
        let text = ScriptedText::new(vec![Err("upstream exploded".into())]);
        let (service, _dir) = test_service(Some(text), None).await;

        let turn = service.submit(&user("alice"), "hello").await.unwrap();
        assert_eq!(turn.content, TEXT_FALLBACK_REPLY);

        let history = service.history(&user("alice")).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn missing_text_provider_stores_fallback_reply() {
        let (service, _dir) = test_service(None, None).await;

        let turn = service.submit(&user("alice"), "hello").await.unwrap();
        assert_eq!(turn.content, TEXT_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn image_exchange_stores_full_command_and_reply() {
        let image = ScriptedImage::new(vec![Ok("data:image/png;base64,UE5H".into())]);
        let handle = image.clone();
        let (service, _dir) = test_service(None, Some(image)).await;

        let turn = service
            .submit(&user("alice"), "/imagine a red fox")
            .await
            .unwrap();
        assert_eq!(turn.content, "Generated image: data:image/png;base64,UE5H");

        // The provider sees the bare prompt, the store keeps the command.
        assert_eq!(handle.seen_prompts().await, vec!["a red fox"]);
        let history = service.history(&user("alice")).await.unwrap();
        assert_eq!(history[0].content, "/imagine a red fox");
    }

    #[tokio::test]
    async fn image_failure_stores_reason_reply() {
        let image = ScriptedImage::new(vec![Err("model not found: acme/model-a".into())]);
        let (service, _dir) = test_service(None, Some(image)).await;

        let turn = service
            .submit(&user("alice"), "/imagine a red fox")
            .await
            .unwrap();
        assert_eq!(
            turn.content,
            "Sorry, I could not generate an image right now. (model not found: acme/model-a)"
        );
    }

    #[tokio::test]
    async fn missing_image_provider_stores_unconfigured_reply() {
        let (service, _dir) = test_service(None, None).await;

        let turn = service
            .submit(&user("alice"), "/imagine a red fox")
            .await
            .unwrap();
        assert_eq!(turn.content, IMAGE_UNCONFIGURED_REPLY);

        let history = service.history(&user("alice")).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn bare_imagine_routes_to_text() {
        let text = ScriptedText::new(vec![Ok("that is not an image command".into())]);
        let handle = text.clone();
        let (service, _dir) = test_service(Some(text), None).await;

        service.submit(&user("alice"), "/imagine").await.unwrap();
        assert_eq!(handle.seen_prompts().await, vec!["/imagine"]);
    }

    #[tokio::test]
    async fn empty_image_prompt_still_routes_to_image() {
        let image = ScriptedImage::new(vec![Ok("data:image/png;base64,UE5H".into())]);
        let handle = image.clone();
        let (service, _dir) = test_service(None, Some(image)).await;

        service.submit(&user("alice"), "/imagine ").await.unwrap();
        assert_eq!(handle.seen_prompts().await, vec![""]);
    }

    #[tokio::test]
    async fn store_failure_aborts_before_generation() {
        let text = ScriptedText::new(vec![Ok("never reached".into())]);
        let handle = text.clone();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.db").to_string_lossy().to_string();
        let config = StorageConfig {
            database_path: path.clone(),
            wal_mode: true,
        };
        let store = Arc::new(ChatStore::open(&config).await.unwrap());
        let service = ChatService::new(store, Some(text), None);

        // Break the schema underneath the open store.
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch("DROP TABLE chat_history;").unwrap();

        let err = service.submit(&user("alice"), "hello").await.unwrap_err();
        assert!(matches!(err, ConfabError::Storage { .. }), "got: {err}");
        assert!(handle.seen_prompts().await.is_empty());
    }

    #[tokio::test]
    async fn per_user_histories_do_not_mix() {
        let text = ScriptedText::new(vec![Ok("for alice".into()), Ok("for bob".into())]);
        let (service, _dir) = test_service(Some(text), None).await;

        service.submit(&user("alice"), "hi from alice").await.unwrap();
        service.submit(&user("bob"), "hi from bob").await.unwrap();

        let alice = service.history(&user("alice")).await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|t| t.user_id == "alice"));

        let bob = service.history(&user("bob")).await.unwrap();
        assert_eq!(bob.len(), 2);
        assert_eq!(bob[1].content, "for bob");
    }

    #[tokio::test]
    async fn duplicate_submissions_append() {
        let text = ScriptedText::new(vec![Ok("first answer".into()), Ok("second answer".into())]);
        let (service, _dir) = test_service(Some(text), None).await;

        service.submit(&user("alice"), "same question").await.unwrap();
        service.submit(&user("alice"), "same question").await.unwrap();

        let history = service.history(&user("alice")).await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[1].content, "first answer");
        assert_eq!(history[3].content, "second answer");
        // Rows stay distinct even with identical content.
        assert_ne!(history[0].id, history[2].id);
    }
}
