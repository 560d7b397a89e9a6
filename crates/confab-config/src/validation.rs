// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, recognized log levels, and
//! sane retry policy parameters.

use crate::diagnostic::ConfigError;
use crate::model::ConfabConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConfabConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of trace, debug, info, warn, error; got `{}`",
                config.service.log_level
            ),
        });
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.model must not be empty".to_string(),
        });
    }

    if config.huggingface.max_attempts_per_model == 0 {
        errors.push(ConfigError::Validation {
            message: "huggingface.max_attempts_per_model must be at least 1".to_string(),
        });
    }

    let warmup = config.huggingface.default_warmup_secs;
    if !warmup.is_finite() || !(0.0..=3600.0).contains(&warmup) {
        errors.push(ConfigError::Validation {
            message: format!(
                "huggingface.default_warmup_secs must be between 0 and 3600, got {warmup}"
            ),
        });
    }

    // The candidate list is preferred_model followed by fallback_models;
    // together they must name at least one model.
    let has_preferred = config
        .huggingface
        .preferred_model
        .as_deref()
        .is_some_and(|m| !m.trim().is_empty());
    if !has_preferred && config.huggingface.fallback_models.is_empty() {
        errors.push(ConfigError::Validation {
            message: "huggingface.fallback_models must not be empty when no preferred_model is set"
                .to_string(),
        });
    }

    for (i, model) in config.huggingface.fallback_models.iter().enumerate() {
        if model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("huggingface.fallback_models[{i}] must not be empty"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let host = config.gateway.host.trim();
        // Accept valid IPv4, IPv6, or hostname patterns
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
