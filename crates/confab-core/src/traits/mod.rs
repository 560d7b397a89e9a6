// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behavioral seams implemented by provider crates.

mod image;
mod text;

pub use image::ImageGenerator;
pub use text::TextGenerator;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{ImageGenerator, TextGenerator};
    use crate::error::ConfabError;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ConfabError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    #[async_trait]
    impl ImageGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn synthesize(&self, prompt: &str) -> Result<String, ConfabError> {
            Err(ConfabError::Provider {
                message: format!("no image for {prompt}"),
                source: None,
            })
        }
    }

    #[tokio::test]
    async fn text_generator_works_behind_a_trait_object() {
        let generator: Arc<dyn TextGenerator> = Arc::new(Echo);
        assert_eq!(generator.name(), "echo");
        assert_eq!(generator.generate("hi").await.unwrap(), "echo: hi");
    }

    #[tokio::test]
    async fn image_generator_errors_survive_dynamic_dispatch() {
        let generator: Arc<dyn ImageGenerator> = Arc::new(Echo);
        let err = generator.synthesize("a fox").await.unwrap_err();
        assert!(matches!(err, ConfabError::Provider { .. }), "got: {err}");
    }
}
