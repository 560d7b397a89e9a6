// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unified error taxonomy for Confab.
//!
//! Every fallible cross-crate operation returns [`ConfabError`]. Variants
//! carry the underlying source where one exists so that callers can log
//! full chains without matching on provider-specific error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfabError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A persistence operation failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An upstream generation provider failed.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The HTTP gateway could not start or serve.
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invariant violation that callers cannot recover from.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_variant_context() {
        let err = ConfabError::Config("gateway.port must not be 0".into());
        assert_eq!(
            err.to_string(),
            "configuration error: gateway.port must not be 0"
        );

        let err = ConfabError::Provider {
            message: "HTTP 500".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "provider error: HTTP 500");
    }

    #[test]
    fn storage_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfabError::Storage {
            source: Box::new(io),
        };
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn string_converts_into_boxed_source() {
        let err = ConfabError::Storage {
            source: "connection closed".into(),
        };
        assert_eq!(err.to_string(), "storage error: connection closed");
    }
}
