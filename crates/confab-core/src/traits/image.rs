// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::ConfabError;

/// Produces an image for a prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Synthesizes an image and returns it as a base64 `data:` URL.
    async fn synthesize(&self, prompt: &str) -> Result<String, ConfabError>;
}
