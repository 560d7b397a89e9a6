// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini generateContent API request/response types.

use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to the Gemini generateContent endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation contents. Confab always sends a single user turn.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Builds a single-turn request carrying `prompt` as one user part.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

/// A content entry -- a role plus an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model". Optional in responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Ordered parts making up this content entry.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part within a content entry. Confab only uses text parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload. Empty when the API returns a non-text part.
    #[serde(default)]
    pub text: String,
}

// --- Response types ---

/// A full response from the generateContent endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates. Empty when the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content. Absent when generation stopped before producing any.
    pub content: Option<Content>,

    /// Reason the generation stopped (e.g., "STOP", "SAFETY").
    pub finish_reason: Option<String>,
}

// --- Error types ---

/// API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorDetail,
}

/// Error detail within an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Numeric error code mirroring the HTTP status.
    pub code: Option<i64>,
    /// Human-readable error message.
    pub message: String,
    /// Canonical status identifier (e.g., "INVALID_ARGUMENT").
    pub status: Option<String>,
}
