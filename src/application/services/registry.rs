//! In-memory participant registry

use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::domain::entities::ChatId;

/// Chat ids that have talked to the bot since the process started.
///
/// Only grows; nothing is persisted.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    ids: RwLock<HashSet<ChatId>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `chat_id`, returning `true` if it was not known before
    pub async fn record(&self, chat_id: ChatId) -> bool {
        let added = self.ids.write().await.insert(chat_id);
        if added {
            tracing::info!(chat_id, "New user added");
        }
        added
    }

    /// Sorted copy of every known id
    pub async fn snapshot(&self) -> Vec<ChatId> {
        let mut ids: Vec<ChatId> = self.ids.read().await.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn contains(&self, chat_id: ChatId) -> bool {
        self.ids.read().await.contains(&chat_id)
    }

    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ids.read().await.is_empty()
    }
}
