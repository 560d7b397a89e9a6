// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Hugging Face model inference API.

use std::time::Duration;

use confab_core::ConfabError;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use crate::types::{InferenceErrorBody, InferenceRequest, encode_data_url};

/// Base URL for the hosted inference API.
const API_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Upper bound for a single warm-up wait. The estimate comes from the wire
/// and must not stall a request for minutes.
const MAX_WARMUP_SECS: f64 = 600.0;

/// HTTP client that walks a list of candidate models until one produces
/// an image.
///
/// Warm-ups (503) retry the same model up to the attempt limit; 404 and
/// other errors move on to the next candidate. The first image wins.
/// Transport failures abort the whole walk.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    candidates: Vec<String>,
    max_attempts_per_model: u32,
    default_warmup_secs: f64,
    base_url: String,
}

impl InferenceClient {
    /// Creates a new client for the given API key and candidate models.
    pub fn new(
        api_key: String,
        candidates: Vec<String>,
        max_attempts_per_model: u32,
        default_warmup_secs: f64,
    ) -> Result<Self, ConfabError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| ConfabError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("image/png"));
        headers.insert("x-wait-for-model", HeaderValue::from_static("true"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfabError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            candidates,
            max_attempts_per_model,
            default_warmup_secs,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing against a mock server).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Generates an image for `prompt` and returns it as a `data:` URL.
    ///
    /// The error carries the most recent per-candidate failure reason, or
    /// "no image data produced" when every candidate only ever warmed up.
    pub async fn generate_image(&self, prompt: &str) -> Result<String, ConfabError> {
        let request = InferenceRequest {
            inputs: prompt.to_string(),
        };
        let mut last_error: Option<String> = None;

        for model in &self.candidates {
            let url = format!("{}/models/{}", self.base_url, model);
            let mut attempt = 0;

            while attempt < self.max_attempts_per_model {
                attempt += 1;

                let response = self
                    .client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| ConfabError::Provider {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    })?;

                let status = response.status();
                let content_type = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                debug!(model = %model, status = %status, attempt, "inference response received");

                if status.is_success() && content_type.starts_with("image/") {
                    let bytes = response.bytes().await.map_err(|e| ConfabError::Provider {
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                    info!(model = %model, bytes = bytes.len(), "image generated");
                    return Ok(encode_data_url(&content_type, &bytes));
                }

                let body = response.text().await.unwrap_or_default();
                let parsed: InferenceErrorBody = serde_json::from_str(&body).unwrap_or_default();

                if status == StatusCode::SERVICE_UNAVAILABLE {
                    if attempt < self.max_attempts_per_model {
                        let wait_secs =
                            warmup_wait_secs(parsed.estimated_time, self.default_warmup_secs);
                        warn!(model = %model, attempt, wait_secs, "model warming up, will retry");
                        tokio::time::sleep(Duration::from_secs_f64(wait_secs)).await;
                        continue;
                    }
                    // Still cold after the last attempt; the next candidate
                    // may already be loaded.
                    warn!(model = %model, "warm-up attempts exhausted, trying next candidate");
                    break;
                }

                if status == StatusCode::NOT_FOUND {
                    warn!(model = %model, "model not found, trying next candidate");
                    last_error = Some(format!("model not found: {model}"));
                    break;
                }

                let reason = parsed
                    .error
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                warn!(model = %model, status = %status, reason = %reason, "image model failed, trying next candidate");
                last_error = Some(reason);
                break;
            }
        }

        Err(ConfabError::Provider {
            message: last_error.unwrap_or_else(|| "no image data produced".to_string()),
            source: None,
        })
    }
}

/// Picks the wait before the next warm-up attempt. The wire estimate is
/// used when positive and finite, the configured default otherwise, and
/// the result never exceeds [`MAX_WARMUP_SECS`].
fn warmup_wait_secs(estimated: Option<f64>, default_secs: f64) -> f64 {
    estimated
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(default_secs)
        .min(MAX_WARMUP_SECS)
}
