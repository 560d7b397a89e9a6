// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini text provider for the Confab chat service.
//!
//! This crate implements [`TextGenerator`] over the Gemini generateContent
//! REST endpoint, mapping a single prompt to a single text reply.

pub mod client;
pub mod types;

use async_trait::async_trait;
use confab_config::model::GeminiConfig;
use confab_core::ConfabError;
use confab_core::traits::TextGenerator;
use tracing::info;

use crate::client::GeminiClient;
use crate::types::GenerateContentResponse;

/// Gemini text provider implementing [`TextGenerator`].
///
/// API key resolution order: config -> `GOOGLE_AI_API_KEY` env var -> disabled.
pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    /// Creates a Gemini generator from the given configuration.
    ///
    /// Returns `Ok(None)` when no API key is available; the chat service
    /// then answers text prompts with its canned fallback reply instead
    /// of calling out.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, ConfabError> {
        let Some(api_key) = resolve_api_key(&config.api_key) else {
            return Ok(None);
        };

        let client = GeminiClient::new(api_key, config.model.clone())?;
        info!(model = %config.model, "Gemini text provider initialized");
        Ok(Some(Self { client }))
    }

    /// Creates a generator with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ConfabError> {
        let response = self.client.generate_content(prompt).await?;
        extract_text(response)
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

    std::env::var("GOOGLE_AI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}

/// Extracts the reply text from the first candidate.
///
/// An empty candidate list is an error (the prompt was blocked or the API
/// answered with an unexpected shape). A candidate without content yields
/// an empty reply, matching what the upstream SDK returns for it.
fn extract_text(response: GenerateContentResponse) -> Result<String, ConfabError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ConfabError::Provider {
            message: "response contained no candidates".to_string(),
            source: None,
        });
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    Ok(text)
}
