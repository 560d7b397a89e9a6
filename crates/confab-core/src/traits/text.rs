// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::ConfabError;

/// Produces a text reply for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Generates a reply for a single prompt. Each call stands alone;
    /// no prior conversation context is sent.
    async fn generate(&self, prompt: &str) -> Result<String, ConfabError>;
}
