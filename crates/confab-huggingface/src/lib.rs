// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hugging Face image provider for the Confab chat service.
//!
//! This crate implements [`ImageGenerator`] over the hosted inference API.
//! A prompt is tried against an ordered list of candidate models; cold
//! models are given time to warm up, broken ones are skipped, and the
//! first image to come back is returned as a `data:` URL.

pub mod client;
pub mod types;

use async_trait::async_trait;
use confab_config::model::HuggingFaceConfig;
use confab_core::ConfabError;
use confab_core::traits::ImageGenerator;
use tracing::info;

use crate::client::InferenceClient;

/// Hugging Face image provider implementing [`ImageGenerator`].
///
/// API key resolution order: config -> `HUGGINGFACE_API_KEY` env var ->
/// disabled.
pub struct HuggingFaceGenerator {
    client: InferenceClient,
}

impl HuggingFaceGenerator {
    /// Creates a Hugging Face generator from the given configuration.
    ///
    /// Returns `Ok(None)` when no API key is available; the chat service
    /// then answers `/imagine` prompts with a fixed not-configured reply
    /// instead of calling out.
    pub fn from_config(config: &HuggingFaceConfig) -> Result<Option<Self>, ConfabError> {
        let Some(api_key) = resolve_api_key(&config.api_key) else {
            return Ok(None);
        };

        let candidates = candidate_models(config);
        let client = InferenceClient::new(
            api_key,
            candidates.clone(),
            config.max_attempts_per_model,
            config.default_warmup_secs,
        )?;
        info!(candidates = ?candidates, "Hugging Face image provider initialized");
        Ok(Some(Self { client }))
    }

    /// Creates a generator with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceGenerator {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn synthesize(&self, prompt: &str) -> Result<String, ConfabError> {
        self.client.generate_image(prompt).await
    }
}

/// Resolves the API key from config or environment. `None` means the
/// provider stays disabled.
fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Some(key.clone());
    }

    std::env::var("HUGGINGFACE_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}

/// Builds the candidate list: the preferred model (when set and non-blank)
/// followed by the configured fallbacks.
fn candidate_models(config: &HuggingFaceConfig) -> Vec<String> {
    let mut models = Vec::new();
    if let Some(preferred) = &config.preferred_model {
        let trimmed = preferred.trim();
        if !trimmed.is_empty() {
            models.push(trimmed.to_string());
        }
    }
    models.extend(config.fallback_models.iter().cloned());
    models
}
