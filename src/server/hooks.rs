//! The two webhook endpoints.
//!
//! Both verify integrity before reading a single body field. The push
//! endpoint answers 401 on a bad signature, 400 on a verified-but-malformed
//! payload, and 200 once the state change is recorded, whether or not a
//! notification went out. The bot endpoint answers 401 on a bad token and
//! 200 for everything else; processing failures after authentication are
//! logged and swallowed, the way the bot platform expects prompt
//! acknowledgment.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use teloxide::types::{Update, UpdateKind};

use crate::core::error::{AppError, AppResult};
use crate::github::{self, PushEvent};
use crate::server::auth::{verify_secret_token, verify_signature};
use crate::server::AppState;
use crate::telegram::commands;

/// Signature header on push deliveries.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Shared-token header on bot updates.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// POST /hook - GitHub push webhook.
pub async fn github_hook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = header_str(&headers, SIGNATURE_HEADER) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if !verify_signature(&body, signature, state.github_secret()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: PushEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("rejecting malformed push payload: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    log::info!(
        "push for {} by {} ({} commits)",
        event.repository.full_name,
        event.pusher.name,
        event.commits.len()
    );

    match github::apply_push(state.pool(), state.notifier(), &event).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(AppError::Payload(e)) => {
            log::warn!("rejecting push payload: {}", e);
            StatusCode::BAD_REQUEST.into_response()
        }
        Err(e) => {
            log::error!("push processing failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /telegram-hook - Telegram bot webhook.
pub async fn telegram_hook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let token = header_str(&headers, SECRET_TOKEN_HEADER).unwrap_or("");
    if !verify_secret_token(token, state.telegram_secret()) {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }

    // Authenticated. From here on the transport always gets 200.
    if let Err(e) = process_update(&state, &body).await {
        log::error!("recovered error while processing update: {}", e);
    }

    StatusCode::OK.into_response()
}

/// Consume one update: only `message.text` and `message.chat.id` matter,
/// everything else in the update schema is ignored.
async fn process_update(state: &AppState, body: &[u8]) -> AppResult<()> {
    let update: Update = serde_json::from_slice(body)?;

    let UpdateKind::Message(message) = update.kind else {
        return Ok(());
    };
    let Some(text) = message.text() else {
        return Ok(());
    };
    let chat = message.chat.id.0.to_string();

    commands::handle_message(state.pool(), state.notifier(), &chat, text).await
}
