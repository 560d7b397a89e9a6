// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication and caller identity extraction.
//!
//! Every API route sits behind [`auth_middleware`]. End users are
//! authenticated by a fronting proxy, which forwards who they are in the
//! `X-Forwarded-User` header; the bearer token proves the request actually
//! came from that proxy.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use confab_core::types::UserIdentity;

/// Authentication settings for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared-secret bearer token expected from the fronting proxy.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak the token into logs.
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware guarding the API routes.
///
/// Rejects the request unless it carries the configured bearer token and a
/// non-empty `X-Forwarded-User` header. On success the caller's
/// [`UserIdentity`] is inserted into the request extensions for handlers
/// to pick up.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.bearer_token.as_deref() else {
        // No token configured -- the gateway cannot tell callers apart, so
        // the API surface stays down until the operator sets one.
        tracing::error!("no auth token configured, refusing API request");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented != Some(expected) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let subject = request
        .headers()
        .get("x-forwarded-user")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let Some(subject) = subject else {
        tracing::warn!("authenticated request missing X-Forwarded-User header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let email = request
        .headers()
        .get("x-forwarded-email")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    request
        .extensions_mut()
        .insert(UserIdentity { subject, email });

    Ok(next.run(request).await)
}
