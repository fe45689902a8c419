//! Best-effort fan-out of one message to many chats

use std::sync::Arc;

use crate::domain::entities::ChatId;
use crate::domain::traits::Bot;

/// What happened during one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<(ChatId, String)>,
}

impl BroadcastReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Sends a message to every recipient, one at a time
pub struct BroadcastService {
    bot: Arc<dyn Bot>,
}

impl BroadcastService {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }

    /// Send `text` to each recipient. A failed send is logged and recorded
    /// but never stops the remaining sends, and nothing is retried.
    pub async fn fan_out(&self, text: &str, recipients: &[ChatId]) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for &chat_id in recipients {
            report.attempted += 1;
            match self.bot.send_message(chat_id, text).await {
                Ok(_) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(chat_id, "Failed to send broadcast: {}", e);
                    report.failures.push((chat_id, e.to_string()));
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed(),
            "Broadcast finished"
        );
        report
    }
}
