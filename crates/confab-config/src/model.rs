// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Confab chat service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Confab configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfabConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Gemini text generation settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Hugging Face image generation settings.
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service, reported by the health endpoint.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "confab".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini text generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Google AI API key. Falls back to the `GOOGLE_AI_API_KEY` environment
    /// variable; text replies degrade to a fixed fallback when neither is set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for text generation.
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Hugging Face image generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HuggingFaceConfig {
    /// Hugging Face API key. Falls back to the `HUGGINGFACE_API_KEY`
    /// environment variable; image generation is disabled when neither is set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model tried before the fallback list. `None` starts directly with
    /// the fallbacks.
    #[serde(default)]
    pub preferred_model: Option<String>,

    /// Models tried in order after `preferred_model`.
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,

    /// Attempts per candidate model before moving to the next one.
    #[serde(default = "default_max_attempts_per_model")]
    pub max_attempts_per_model: u32,

    /// Seconds to wait on a warming-up model when the response carries
    /// no estimate of its own.
    #[serde(default = "default_warmup_secs")]
    pub default_warmup_secs: f64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            preferred_model: None,
            fallback_models: default_fallback_models(),
            max_attempts_per_model: default_max_attempts_per_model(),
            default_warmup_secs: default_warmup_secs(),
        }
    }
}

fn default_fallback_models() -> Vec<String> {
    vec![
        "stabilityai/sdxl-turbo".to_string(),
        "runwayml/stable-diffusion-v1-5".to_string(),
        "stabilityai/stable-diffusion-2-1".to_string(),
    ]
}

fn default_max_attempts_per_model() -> u32 {
    3
}

fn default_warmup_secs() -> f64 {
    2.0
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "confab.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the gateway to.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind the gateway to.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Static bearer token required on API routes. When unset the gateway
    /// refuses API requests rather than serving them unauthenticated.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            auth_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}
