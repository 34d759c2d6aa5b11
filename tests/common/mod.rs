//! Shared test utilities for the integration suite.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use tempfile::TempDir;

use lockrelay::server::auth::{compute_signature, format_signature_header};
use lockrelay::server::AppState;
use lockrelay::storage::{create_pool, DbPool};
use lockrelay::testing::RecordingNotifier;

pub const GH_SECRET: &[u8] = b"github-hook-secret";
pub const TG_SECRET: &str = "telegram-hook-secret";

/// Pool over a throwaway SQLite file with one tracked server, `org/demo`,
/// optionally pre-subscribed to a channel.
pub fn seeded_pool(dir: &TempDir, channel: Option<&str>) -> DbPool {
    let path = dir.path().join("relay.sqlite");
    let pool = create_pool(path.to_str().unwrap()).unwrap();

    let conn = pool.get().unwrap();
    conn.execute(
        "INSERT INTO ServerStatus (Name, IsOpen, LockHolder, ChannelID) VALUES (?1, 0, NULL, ?2)",
        rusqlite::params!["org/demo", channel],
    )
    .unwrap();

    pool
}

/// Full application state around a seeded pool and a recording notifier.
pub fn test_state(dir: &TempDir, channel: Option<&str>) -> (AppState, Arc<RecordingNotifier>, DbPool) {
    let pool = seeded_pool(dir, channel);
    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(
        pool.clone(),
        notifier.clone(),
        GH_SECRET.to_vec(),
        TG_SECRET,
    );
    (state, notifier, pool)
}

/// A push delivery body in GitHub's wire shape.
pub fn push_body(messages: &[&str], repo: &str, pusher: &str) -> Vec<u8> {
    let commits: Vec<_> = messages
        .iter()
        .map(|m| serde_json::json!({"id": "0000000", "message": m}))
        .collect();
    serde_json::to_vec(&serde_json::json!({
        "ref": "refs/heads/main",
        "commits": commits,
        "repository": {"full_name": repo},
        "pusher": {"name": pusher},
    }))
    .unwrap()
}

/// POST /hook request signed with `secret`.
pub fn signed_push_request(secret: &[u8], body: Vec<u8>) -> Request<Body> {
    let header = format_signature_header(&compute_signature(&body, secret));

    Request::builder()
        .method("POST")
        .uri("/hook")
        .header("content-type", "application/json")
        .header("x-hub-signature-256", header)
        .body(Body::from(body))
        .unwrap()
}

/// A bot update body carrying one text message, in Telegram's wire shape.
pub fn message_update_body(chat_id: i64, text: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 100,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private", "first_name": "Test"},
            "from": {"id": chat_id, "is_bot": false, "first_name": "Test"},
            "text": text,
        }
    }))
    .unwrap()
}

/// POST /telegram-hook request carrying `token` in the secret header.
pub fn telegram_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/telegram-hook")
        .header("content-type", "application/json")
        .header("x-telegram-bot-api-secret-token", token)
        .body(Body::from(body))
        .unwrap()
}

/// Current (IsOpen, LockHolder) of a server, straight from the store.
pub fn row_state(pool: &DbPool, name: &str) -> (bool, Option<String>) {
    let conn = pool.get().unwrap();
    let status = lockrelay::storage::db::get_status(&conn, name).unwrap();
    (status.is_open, status.lock_holder)
}
