//! The message-sending seam.
//!
//! Handlers talk to a [`Notify`] capability keyed by chat identifier, not
//! to the Bot API directly; [`TelegramNotifier`] is the production
//! implementation, tests substitute a recording double.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;

use crate::core::error::{AppError, AppResult};
use crate::telegram::markdown::send_message_markdown_v2;

/// Message-sending capability keyed by chat identifier.
#[async_trait]
pub trait Notify: Send + Sync {
    /// Send MarkdownV2-formatted text to a chat or channel.
    async fn send_markdown(&self, chat: &str, text: &str) -> AppResult<()>;

    /// Send plain text to a chat or channel.
    async fn send_plain(&self, chat: &str, text: &str) -> AppResult<()>;
}

/// Interpret a stored channel identifier as a Bot API recipient.
///
/// ChannelID is TEXT in the store: either a numeric chat id (what the
/// subscribe command writes) or an `@channel` username provisioned by hand.
pub fn parse_recipient(chat: &str) -> AppResult<Recipient> {
    if let Some(username) = chat.strip_prefix('@') {
        if !username.is_empty() {
            return Ok(Recipient::ChannelUsername(chat.to_string()));
        }
    }

    chat.parse::<i64>()
        .map(|id| Recipient::Id(ChatId(id)))
        .map_err(|_| AppError::InvalidChannel(chat.to_string()))
}

/// [`Notify`] backed by the Telegram Bot API.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notify for TelegramNotifier {
    async fn send_markdown(&self, chat: &str, text: &str) -> AppResult<()> {
        let recipient = parse_recipient(chat)?;
        send_message_markdown_v2(&self.bot, recipient, text).await?;
        Ok(())
    }

    async fn send_plain(&self, chat: &str, text: &str) -> AppResult<()> {
        let recipient = parse_recipient(chat)?;
        self.bot.send_message(recipient, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_channels_become_chat_ids() {
        assert_eq!(
            parse_recipient("-1001234").unwrap(),
            Recipient::Id(ChatId(-1001234))
        );
        assert_eq!(parse_recipient("42").unwrap(), Recipient::Id(ChatId(42)));
    }

    #[test]
    fn at_prefixed_channels_stay_usernames() {
        assert_eq!(
            parse_recipient("@ops").unwrap(),
            Recipient::ChannelUsername("@ops".to_string())
        );
    }

    #[test]
    fn garbage_channels_are_rejected() {
        assert!(matches!(
            parse_recipient("not-a-chat"),
            Err(AppError::InvalidChannel(_))
        ));
        assert!(matches!(parse_recipient("@"), Err(AppError::InvalidChannel(_))));
        assert!(matches!(parse_recipient(""), Err(AppError::InvalidChannel(_))));
    }
}
