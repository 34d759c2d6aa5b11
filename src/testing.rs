//! Test support: notifier doubles used by unit and integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::{AppError, AppResult};
use crate::telegram::notifications::Notify;

/// One message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: String,
    pub text: String,
    pub markdown: bool,
}

/// [`Notify`] double that records outbound messages instead of calling the
/// Bot API. Flip `fail_sends` to simulate a transport outage.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
    fail_sends: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    /// Snapshot of everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, chat: &str, text: &str, markdown: bool) -> AppResult<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(AppError::Notification("simulated send failure".to_string()));
        }

        let message = SentMessage {
            chat: chat.to_string(),
            text: text.to_string(),
            markdown,
        };
        match self.sent.lock() {
            Ok(mut guard) => guard.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
        Ok(())
    }
}

#[async_trait]
impl Notify for RecordingNotifier {
    async fn send_markdown(&self, chat: &str, text: &str) -> AppResult<()> {
        self.record(chat, text, true)
    }

    async fn send_plain(&self, chat: &str, text: &str) -> AppResult<()> {
        self.record(chat, text, false)
    }
}
