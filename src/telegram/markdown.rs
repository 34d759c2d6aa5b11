use teloxide::prelude::*;
use teloxide::types::{ParseMode, Recipient};
use teloxide::RequestError;

use crate::core::utils::escape_markdown_v2;

fn is_markdown_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

/// Send a MarkdownV2 message and auto-escape on parse errors.
///
/// Dynamic fields are escaped by the callers; the retry covers the cases
/// where an operator-provided value still breaks entity parsing.
pub async fn send_message_markdown_v2(
    bot: &Bot,
    chat: Recipient,
    text: impl Into<String>,
) -> ResponseResult<Message> {
    let raw_text = text.into();
    let req = bot
        .send_message(chat.clone(), raw_text.clone())
        .parse_mode(ParseMode::MarkdownV2);

    match req.await {
        Ok(msg) => Ok(msg),
        Err(e) if is_markdown_parse_error(&e) => {
            let escaped = escape_markdown_v2(&raw_text);
            bot.send_message(chat, escaped)
                .parse_mode(ParseMode::MarkdownV2)
                .await
        }
        Err(e) => Err(e),
    }
}
