// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated HTTP gateway for the Confab chat service.
//!
//! Exposes three routes: `POST /v1/chat` and `GET /v1/history` behind
//! bearer-token auth, plus a public `GET /health` liveness probe. Caller
//! identity arrives in the `X-Forwarded-User` / `X-Forwarded-Email` headers
//! set by the fronting proxy.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
