//! GitHub push interpretation: the lock state machine.
//!
//! A push either takes the server lock or releases it. The only intent
//! signal is the most recent commit's message: pushes whose last commit
//! mentions [`LOCK_PHRASE`] open the server for the pusher, every other
//! push closes it. The decision is applied as one absolute store write, so
//! replaying the same push is idempotent.

use serde::Deserialize;

use crate::core::error::{AppError, AppResult};
use crate::core::utils::{escape_markdown_v2, escape_markdown_v2_code};
use crate::storage::db::{self, DbPool};
use crate::telegram::notifications::Notify;

/// Commit-message marker that claims the lock.
pub const LOCK_PHRASE: &str = "Acquiring lock";

/// The fields of a push webhook the relay consumes.
#[derive(Debug, Deserialize)]
pub struct PushEvent {
    pub commits: Vec<Commit>,
    pub repository: Repository,
    pub pusher: Pusher,
}

#[derive(Debug, Deserialize)]
pub struct Commit {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct Pusher {
    pub name: String,
}

/// Target lock state derived from one push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockTransition {
    Opened { holder: String },
    Closed,
}

/// Decide the target state from the most recent commit of a push.
///
/// # Errors
///
/// A push without commits carries no intent signal and is rejected as a
/// malformed payload.
pub fn decide_transition(event: &PushEvent) -> AppResult<LockTransition> {
    let last = event
        .commits
        .last()
        .ok_or_else(|| AppError::Payload("push event carries no commits".to_string()))?;

    if last.message.contains(LOCK_PHRASE) {
        Ok(LockTransition::Opened {
            holder: event.pusher.name.clone(),
        })
    } else {
        Ok(LockTransition::Closed)
    }
}

/// Channel notification text for a transition, MarkdownV2-escaped.
pub fn status_change_text(name: &str, transition: &LockTransition) -> String {
    match transition {
        LockTransition::Opened { holder } => format!(
            "`{}` was *OPENED* by _{}_",
            escape_markdown_v2_code(name),
            escape_markdown_v2(holder)
        ),
        LockTransition::Closed => format!("`{}` was *CLOSED*", escape_markdown_v2_code(name)),
    }
}

/// Apply a verified push: write the new state, then notify the subscribed
/// channel if there is one.
///
/// The store update is authoritative; the notification is best-effort and a
/// send failure is logged, not returned.
pub async fn apply_push(pool: &DbPool, notifier: &dyn Notify, event: &PushEvent) -> AppResult<()> {
    let transition = decide_transition(event)?;
    let name = &event.repository.full_name;

    let channel = {
        let conn = db::get_connection(pool)?;

        let affected = match &transition {
            LockTransition::Opened { holder } => db::set_open(&conn, name, holder)?,
            LockTransition::Closed => db::set_closed(&conn, name)?,
        };
        if affected == 0 {
            log::warn!("push for untracked server {:?}; status not recorded", name);
            return Ok(());
        }

        match db::get_status_and_channel(&conn, name) {
            Ok(row) => row.channel_id,
            Err(e) => {
                log::warn!("subscriber lookup for {:?} failed: {}", name, e);
                None
            }
        }
    };

    let Some(channel) = channel else {
        return Ok(());
    };

    let text = status_change_text(name, &transition);
    if let Err(e) = notifier.send_markdown(&channel, &text).await {
        log::error!("status notification to {:?} failed: {}", channel, e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn push(messages: &[&str], repo: &str, pusher: &str) -> PushEvent {
        PushEvent {
            commits: messages
                .iter()
                .map(|m| Commit {
                    message: (*m).to_string(),
                })
                .collect(),
            repository: Repository {
                full_name: repo.to_string(),
            },
            pusher: Pusher {
                name: pusher.to_string(),
            },
        }
    }

    #[test]
    fn lock_phrase_in_last_commit_opens() {
        let event = push(&["setup", "Acquiring lock for deploy"], "org/demo", "alice");
        assert_eq!(
            decide_transition(&event).unwrap(),
            LockTransition::Opened {
                holder: "alice".to_string(),
            }
        );
    }

    #[test]
    fn only_the_last_commit_counts() {
        let event = push(&["Acquiring lock", "Releasing lock"], "org/demo", "alice");
        assert_eq!(decide_transition(&event).unwrap(), LockTransition::Closed);
    }

    #[test]
    fn any_other_message_closes() {
        let event = push(&["fix typo"], "org/demo", "bob");
        assert_eq!(decide_transition(&event).unwrap(), LockTransition::Closed);
    }

    #[test]
    fn empty_push_is_malformed() {
        let event = push(&[], "org/demo", "alice");
        assert!(matches!(
            decide_transition(&event),
            Err(AppError::Payload(_))
        ));
    }

    #[test]
    fn notification_text_escapes_dynamic_fields() {
        let opened = LockTransition::Opened {
            holder: "a_lice".to_string(),
        };
        assert_eq!(
            status_change_text("org/demo", &opened),
            "`org/demo` was *OPENED* by _a\\_lice_"
        );
        assert_eq!(
            status_change_text("org/demo", &LockTransition::Closed),
            "`org/demo` was *CLOSED*"
        );
    }

    #[test]
    fn payload_deserializes_from_github_shape() {
        let event: PushEvent = serde_json::from_value(serde_json::json!({
            "ref": "refs/heads/main",
            "commits": [
                {"id": "aaa", "message": "one"},
                {"id": "bbb", "message": "Acquiring lock"}
            ],
            "repository": {"full_name": "org/demo", "private": false},
            "pusher": {"name": "alice", "email": "a@example.com"}
        }))
        .unwrap();

        assert_eq!(event.repository.full_name, "org/demo");
        assert_eq!(event.pusher.name, "alice");
        assert_eq!(event.commits.len(), 2);
    }
}
