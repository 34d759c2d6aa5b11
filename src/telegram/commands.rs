//! Bot command parsing and dispatch.
//!
//! Grammar: `/<command>[@<botname>] [<argument...>]`. The first
//! whitespace-delimited token is the command (any `@botname` suffix is
//! stripped), the trimmed remainder is a single free-text argument; server
//! names may contain `/`. Text without a leading `/` is not a command and
//! is ignored.

use futures_util::future::join_all;

use crate::core::error::{AppError, AppResult};
use crate::core::utils::{escape_markdown_v2, escape_markdown_v2_code};
use crate::storage::db::{self, DbPool, LockStatus};
use crate::telegram::notifications::Notify;

/// Static `/help` reply.
pub const AVAILABLE_COMMANDS: &str =
    "Available commands are:\n\n- /status <server-name>\n- /subscribe <server-name>\n- /help";

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status(Option<String>),
    Subscribe(Option<String>),
    Help,
    Unknown(String),
}

/// Parse message text into a command. `None` means the text is not a
/// command at all.
pub fn parse_command(text: &str) -> Option<Command> {
    if !text.starts_with('/') {
        return None;
    }

    let (head, argument) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };

    let name = &head[1..];
    let name = match name.split_once('@') {
        Some((bare, _botname)) => bare,
        None => name,
    };

    let argument = if argument.is_empty() {
        None
    } else {
        Some(argument.to_string())
    };

    Some(match name {
        "status" => Command::Status(argument),
        "subscribe" => Command::Subscribe(argument),
        "help" => Command::Help,
        other => Command::Unknown(other.to_string()),
    })
}

fn status_report_text(name: &str, status: &LockStatus) -> String {
    if status.is_open {
        // A missing holder on an open row means the write discipline was
        // bypassed; show a placeholder rather than hide the row.
        let holder = status.lock_holder.as_deref().unwrap_or("unknown");
        format!(
            "`{}` is currently *OPEN* by _{}_",
            escape_markdown_v2_code(name),
            escape_markdown_v2(holder)
        )
    } else {
        format!("`{}` is currently *CLOSE*", escape_markdown_v2_code(name))
    }
}

async fn send_help(notifier: &dyn Notify, chat: &str, reason: &str) -> AppResult<()> {
    notifier
        .send_plain(chat, &format!("Error: {}. Type /help for more information", reason))
        .await
}

/// Report one server's status, or a help message when the lookup cannot
/// name exactly one row.
async fn report_status(
    pool: &DbPool,
    notifier: &dyn Notify,
    chat: &str,
    name: &str,
) -> AppResult<()> {
    let looked_up = {
        let conn = db::get_connection(pool)?;
        db::get_status(&conn, name)
    };

    match looked_up {
        Ok(status) => {
            notifier
                .send_markdown(chat, &status_report_text(name, &status))
                .await
        }
        Err(e @ AppError::ServerNotFound(_)) => send_help(notifier, chat, &e.to_string()).await,
        Err(e @ AppError::AmbiguousServer { .. }) => {
            log::warn!("status lookup for {:?}: {}", name, e);
            send_help(notifier, chat, &e.to_string()).await
        }
        Err(e) => Err(e),
    }
}

/// Report every server subscribed to this chat, concurrently.
async fn report_subscriptions(pool: &DbPool, notifier: &dyn Notify, chat: &str) -> AppResult<()> {
    let names = {
        let conn = db::get_connection(pool)?;
        db::subscribed_servers(&conn, chat)?
    };

    if names.is_empty() {
        return send_help(notifier, chat, "no server specified").await;
    }

    // Jointly awaited; one failed lookup must not block the siblings.
    let reports = names
        .iter()
        .map(|name| report_status(pool, notifier, chat, name));
    for result in join_all(reports).await {
        if let Err(e) = result {
            log::error!("status fan-out report failed: {}", e);
        }
    }

    Ok(())
}

async fn subscribe(pool: &DbPool, notifier: &dyn Notify, chat: &str, name: &str) -> AppResult<()> {
    let affected = {
        let conn = db::get_connection(pool)?;
        db::set_subscription(&conn, name, chat)?
    };
    if affected == 0 {
        log::warn!("subscribe from chat {} targets untracked server {:?}", chat, name);
    }

    notifier
        .send_markdown(
            chat,
            &format!("Subscribed to `{}`", escape_markdown_v2_code(name)),
        )
        .await
}

/// Dispatch one message from a chat.
///
/// Non-command text returns without side effects; every command path sends
/// at least one reply.
pub async fn handle_message(
    pool: &DbPool,
    notifier: &dyn Notify,
    chat: &str,
    text: &str,
) -> AppResult<()> {
    let Some(command) = parse_command(text) else {
        return Ok(());
    };
    log::info!("[{}] {}", chat, text);

    match command {
        Command::Status(Some(name)) => report_status(pool, notifier, chat, &name).await,
        Command::Status(None) => report_subscriptions(pool, notifier, chat).await,
        Command::Subscribe(Some(name)) => subscribe(pool, notifier, chat, &name).await,
        Command::Subscribe(None) => send_help(notifier, chat, "no server specified").await,
        Command::Help => notifier.send_plain(chat, AVAILABLE_COMMANDS).await,
        Command::Unknown(_) => send_help(notifier, chat, "command does not exist").await,
    }
}
