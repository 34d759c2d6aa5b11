//! Lockrelay - notification relay between GitHub pushes and Telegram.
//!
//! Receives GitHub push webhooks and Telegram bot updates, keeps a
//! `ServerStatus` lock table in SQLite, and notifies the subscribed
//! Telegram channel when a server is opened or closed based on the last
//! commit message of a push.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, text helpers
//! - `storage`: database pool, migrations, and the status store gateway
//! - `github`: push payload interpretation and the lock state machine
//! - `telegram`: bot construction, command handling, outbound messages
//! - `server`: HTTP endpoints and request integrity

pub mod core;
pub mod github;
pub mod server;
pub mod storage;
pub mod telegram;
pub mod testing;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::server::{build_router, AppState};
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool};
pub use crate::telegram::{create_bot, Notify, TelegramNotifier};
