// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the gateway API routes.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use confab_core::types::{ChatTurn, UserIdentity};

use crate::server::GatewayState;

// --- Request/response types ---

/// Body of `POST /v1/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's submission. An `/imagine ` prefix requests an image.
    #[serde(default)]
    pub content: String,
}

/// Successful response to `POST /v1/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The persisted model turn answering this submission.
    pub reply: ChatTurn,
}

/// Response to `GET /v1/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The caller's full history, oldest first.
    pub turns: Vec<ChatTurn>,
}

/// Response to `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error body returned by API routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// --- Handlers ---

/// `POST /v1/chat` -- run one exchange and return the model turn.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserIdentity>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if body.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "content must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    match state.chat.submit(&user, &body.content).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse { reply })).into_response(),
        Err(e) => {
            tracing::error!(user = %user.subject, error = %e, "chat exchange failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to record the exchange".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /v1/history` -- return the caller's conversation, oldest first.
pub async fn get_history(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserIdentity>,
) -> Response {
    match state.chat.history(&user).await {
        Ok(turns) => (StatusCode::OK, Json(HistoryResponse { turns })).into_response(),
        Err(e) => {
            tracing::error!(user = %user.subject, error = %e, "history load failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to load history".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /health` -- unauthenticated liveness probe.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.health.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_core::types::TurnRole;

    #[test]
    fn chat_request_deserializes() {
        let body: ChatRequest = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(body.content, "hello");
    }

    #[test]
    fn chat_request_defaults_missing_content_to_empty() {
        let body: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(body.content.is_empty());
    }

    #[test]
    fn chat_response_serializes_turn() {
        let response = ChatResponse {
            reply: ChatTurn {
                id: "turn-1".into(),
                user_id: "alice".into(),
                role: TurnRole::Model,
                content: "hi there".into(),
                created_at: "2026-02-11T09:30:00.000Z".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["reply"]["role"], "model");
        assert_eq!(json["reply"]["content"], "hi there");
    }

    #[test]
    fn error_response_serializes() {
        let json = serde_json::to_value(ErrorResponse {
            error: "content must not be empty".to_string(),
        })
        .unwrap();
        assert_eq!(json["error"], "content must not be empty");
    }

    #[test]
    fn health_response_serializes() {
        let json = serde_json::to_value(HealthResponse {
            status: "ok".to_string(),
            service: "confab".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        })
        .unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["uptime_secs"], 42);
    }
}
