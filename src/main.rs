//! Ledger Service - Main Application Entry Point
//!
//! This is a REST API server holding account balances in memory and moving
//! money between accounts.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the notifier chain (log, plus webhook when configured)
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use std::sync::Arc;

use ledger_transfer_service::{
    AccountsService,
    config::Config,
    routes,
    services::notification_service::{CompositeNotifier, LogNotifier, Notifier, WebhookNotifier},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let mut notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(LogNotifier)];
    if let Some(webhook) = config.webhook()? {
        tracing::info!("Notification webhook enabled: {}", webhook.url);
        notifiers.push(Arc::new(WebhookNotifier::new(webhook.url, webhook.secret)?));
    }
    let service = Arc::new(AccountsService::new(Arc::new(CompositeNotifier::new(
        notifiers,
    ))));

    let app = routes::router(service);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
