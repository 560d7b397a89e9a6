// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `confab serve` command implementation.
//!
//! Starts the HTTP gateway backed by SQLite chat history, the Gemini text
//! provider, and the Hugging Face image provider. Providers without
//! credentials are left unconfigured; the chat service stores fixed
//! fallback replies in their place.

use std::sync::Arc;

use tracing::{info, warn};

use confab_chat::ChatService;
use confab_config::ConfabConfig;
use confab_core::ConfabError;
use confab_core::traits::{ImageGenerator, TextGenerator};
use confab_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use confab_gemini::GeminiGenerator;
use confab_huggingface::HuggingFaceGenerator;
use confab_storage::ChatStore;

/// Runs the `confab serve` command.
///
/// Opens the store, initializes whichever providers have credentials, and
/// serves the gateway until a shutdown signal arrives.
pub async fn run_serve(config: ConfabConfig) -> Result<(), ConfabError> {
    init_tracing(&config.service.log_level);

    info!("starting confab serve");

    let store = Arc::new(ChatStore::open(&config.storage).await?);
    store.health_check().await?;

    let text = GeminiGenerator::from_config(&config.gemini)?
        .map(|g| Arc::new(g) as Arc<dyn TextGenerator>);
    if text.is_none() {
        warn!("no Gemini API key configured, text replies will use the fallback message");
    }

    let image = HuggingFaceGenerator::from_config(&config.huggingface)?
        .map(|g| Arc::new(g) as Arc<dyn ImageGenerator>);
    if image.is_none() {
        info!("no Hugging Face API key configured, image generation disabled");
    }

    if config.gateway.auth_token.is_none() {
        warn!("no gateway auth token configured, API requests will be refused");
    }

    let chat = Arc::new(ChatService::new(store.clone(), text, image));

    let state = GatewayState {
        chat,
        auth: AuthConfig {
            bearer_token: config.gateway.auth_token.clone(),
        },
        health: HealthState::new(config.service.name.clone()),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    confab_gateway::start_server(&server_config, state, shutdown_signal()).await?;

    store.close().await?;
    info!("confab serve shutdown complete");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received, starting graceful shutdown");
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("confab={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
