//! Telegram integration: bot construction, command handling, outbound
//! notifications.

pub mod bot;
pub mod commands;
pub mod markdown;
pub mod notifications;

pub use bot::create_bot;
pub use notifications::{Notify, TelegramNotifier};
