//! Slack Connector - webhook relay from Slack to the Kyma event bus.
//!
//! This binary:
//! - Receives Slack Events API callbacks
//! - Verifies their signature
//! - Forwards a normalized event envelope to Kyma
//! - Answers with a status code reflecting the outcome

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use slack_connector::events::EnvelopeValidator;
use slack_connector::{router, AppState, Config, KymaSender, SlackValidator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("slack_connector_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        signing_secret_configured = !config.signing_secret.is_empty(),
        signature_max_age = config.signature_max_age,
        events_url = %config.events_url,
        source_id = %config.source_id(),
        event_type_version = %config.event_type_version,
        "config_loaded"
    );

    if config.signing_secret.is_empty() {
        warn!("slack_signing_secret_not_configured");
    }

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let validator = Arc::new(SlackValidator::new(
        config.signing_secret.clone(),
        config.signature_max_age,
    ));
    let sender = Arc::new(KymaSender::new(
        client,
        Arc::new(EnvelopeValidator),
        config.events_url.clone(),
    ));

    let port = config.port;
    let app = router(AppState::new(config, validator, sender));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "slack_connector_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("slack_connector_shutdown_complete");

    Ok(())
}

/// Resolve once SIGINT or SIGTERM arrives.
///
/// If a handler cannot be installed the failure is logged and that signal is ignored.
async fn shutdown_signal() {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!(error = %e, "sigint_handler_unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };

    info!(signal = received, "slack_connector_shutting_down");
}
