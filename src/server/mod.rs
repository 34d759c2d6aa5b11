//! HTTP surface of the relay.
//!
//! # Endpoints
//!
//! - `POST /hook` - GitHub push webhook (HMAC-signed)
//! - `POST /telegram-hook` - Telegram bot webhook (shared secret token)
//! - `GET /ping` - liveness probe
//! - `GET /health` - health check

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::storage::db::DbPool;
use crate::telegram::notifications::Notify;

pub mod auth;
pub mod hooks;

pub use hooks::{github_hook_handler, telegram_hook_handler};

/// Shared application state, passed to all handlers via axum's `State`
/// extractor. Secrets are read once at startup and live here; the request
/// path never touches the environment.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: DbPool,
    notifier: Arc<dyn Notify>,
    github_secret: Vec<u8>,
    telegram_secret: String,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        notifier: Arc<dyn Notify>,
        github_secret: impl Into<Vec<u8>>,
        telegram_secret: impl Into<String>,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                pool,
                notifier,
                github_secret: github_secret.into(),
                telegram_secret: telegram_secret.into(),
            }),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.inner.pool
    }

    pub fn notifier(&self) -> &dyn Notify {
        &*self.inner.notifier
    }

    pub fn github_secret(&self) -> &[u8] {
        &self.inner.github_secret
    }

    pub fn telegram_secret(&self) -> &str {
        &self.inner.telegram_secret
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/hook", post(github_hook_handler))
        .route("/telegram-hook", post(telegram_hook_handler))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// GET /ping - liveness probe.
async fn ping_handler() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health - health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
