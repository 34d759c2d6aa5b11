use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: lockrelay.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "lockrelay.sqlite".to_string()));

/// Log file path, in addition to terminal output
/// Read from LOG_FILE_PATH environment variable; unset means terminal only
pub static LOG_FILE_PATH: Lazy<Option<String>> = Lazy::new(|| env::var("LOG_FILE_PATH").ok());

/// HTTP listen port
/// Read from PORT environment variable
/// Default: 8080
pub static PORT: Lazy<u16> = Lazy::new(|| {
    env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
});

/// Custom Bot API server URL
/// Read from BOT_API_URL environment variable; unset means api.telegram.org
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Environment keys that must be non-empty before the relay starts.
/// The bot token is checked separately because it has two accepted names.
pub const REQUIRED_KEYS: &[&str] = &["GH_HOOK_SECRET", "TG_HOOK_SECRET"];

/// Fail-fast lookup of a required environment variable.
///
/// An empty value counts as missing; callers never see a silent default for
/// a secret.
pub fn require(name: &'static str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::ConfigMissing(name)),
    }
}

/// Bot API token, from BOT_TOKEN or the teloxide-conventional TELOXIDE_TOKEN.
pub fn bot_token() -> AppResult<String> {
    require("BOT_TOKEN")
        .or_else(|_| require("TELOXIDE_TOKEN"))
        .map_err(|_| AppError::ConfigMissing("BOT_TOKEN"))
}

/// Check every required key once at startup so a missing secret is a loud
/// boot failure instead of a 500 on the first request.
pub fn ensure_required() -> AppResult<()> {
    bot_token()?;
    for key in REQUIRED_KEYS {
        require(key)?;
    }
    Ok(())
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for outbound Telegram calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn require_rejects_missing_and_empty() {
        // Safety: serialized; nothing else touches the environment here.
        unsafe {
            env::remove_var("LOCKRELAY_TEST_KEY");
        }
        assert!(matches!(
            require("LOCKRELAY_TEST_KEY"),
            Err(AppError::ConfigMissing("LOCKRELAY_TEST_KEY"))
        ));

        unsafe {
            env::set_var("LOCKRELAY_TEST_KEY", "");
        }
        assert!(require("LOCKRELAY_TEST_KEY").is_err());

        unsafe {
            env::set_var("LOCKRELAY_TEST_KEY", "value");
        }
        assert_eq!(require("LOCKRELAY_TEST_KEY").ok().as_deref(), Some("value"));

        unsafe {
            env::remove_var("LOCKRELAY_TEST_KEY");
        }
    }

    #[test]
    #[serial]
    fn bot_token_accepts_either_name() {
        unsafe {
            env::remove_var("BOT_TOKEN");
            env::set_var("TELOXIDE_TOKEN", "123:abc");
        }
        assert_eq!(bot_token().ok().as_deref(), Some("123:abc"));

        unsafe {
            env::set_var("BOT_TOKEN", "456:def");
        }
        assert_eq!(bot_token().ok().as_deref(), Some("456:def"));

        unsafe {
            env::remove_var("BOT_TOKEN");
            env::remove_var("TELOXIDE_TOKEN");
        }
        assert!(matches!(
            bot_token(),
            Err(AppError::ConfigMissing("BOT_TOKEN"))
        ));
    }
}
