use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use lockrelay::core::{config, init_logger};
use lockrelay::server::{build_router, AppState};
use lockrelay::storage::create_pool;
use lockrelay::telegram::{create_bot, TelegramNotifier};

/// Main entry point for the relay.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration,
/// database, bot creation) or the server cannot bind.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(config::LOG_FILE_PATH.as_deref())?;

    // Missing secrets are a boot failure, not a per-request 500.
    config::ensure_required()?;
    let bot_token = config::bot_token()?;
    let github_secret = config::require("GH_HOOK_SECRET")?;
    let telegram_secret = config::require("TG_HOOK_SECRET")?;

    let pool = create_pool(&config::DATABASE_PATH)?;
    log::info!("Database ready at {}", config::DATABASE_PATH.as_str());

    let bot = create_bot(&bot_token)?;
    let notifier = Arc::new(TelegramNotifier::new(bot));

    let state = AppState::new(pool, notifier, github_secret.into_bytes(), telegram_secret);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], *config::PORT));
    log::info!("Starting relay on http://{}", addr);
    log::info!("  POST /hook           - GitHub push webhook");
    log::info!("  POST /telegram-hook  - Telegram bot webhook");
    log::info!("  GET  /ping           - liveness probe");
    log::info!("  GET  /health         - health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    log::info!("Shutting down");
}
