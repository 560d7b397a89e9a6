// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hugging Face inference API request/response types.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Request body for a model inference call.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest {
    /// The image prompt.
    pub inputs: String,
}

/// Error body returned for non-image responses.
///
/// Both fields are optional on the wire; an unparseable body decays to the
/// all-`None` default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub error: Option<String>,

    /// Seconds until a cold model is expected to finish loading.
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

/// Encodes raw image bytes as a `data:` URL with the given content type.
pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{content_type};base64,{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_inference_request_wire_shape() {
        let req = InferenceRequest {
            inputs: "a red fox in the snow".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"inputs": "a red fox in the snow"}));
    }

    #[test]
    fn deserialize_error_body_with_estimate() {
        let json = r#"{"error": "Model stabilityai/sdxl-turbo is currently loading", "estimated_time": 20.5}"#;
        let body: InferenceErrorBody = serde_json::from_str(json).unwrap();
        assert!(body.error.as_deref().unwrap().contains("currently loading"));
        assert_eq!(body.estimated_time, Some(20.5));
    }

    #[test]
    fn deserialize_error_body_message_only() {
        let json = r#"{"error": "Authorization header is correct, but the token seems invalid"}"#;
        let body: InferenceErrorBody = serde_json::from_str(json).unwrap();
        assert!(body.error.is_some());
        assert!(body.estimated_time.is_none());
    }

    #[test]
    fn unparseable_body_decays_to_default() {
        let body: InferenceErrorBody =
            serde_json::from_str("<html>Bad Gateway</html>").unwrap_or_default();
        assert!(body.error.is_none());
        assert!(body.estimated_time.is_none());
    }

    #[test]
    fn encode_data_url_formats_png() {
        let url = encode_data_url("image/png", b"PNG");
        assert_eq!(url, "data:image/png;base64,UE5H");
    }

    #[test]
    fn encode_data_url_keeps_content_type() {
        let url = encode_data_url("image/jpeg", &[0xFF, 0xD8]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
