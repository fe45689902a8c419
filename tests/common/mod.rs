//! Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use cinebot::application::errors::{BotError, CatalogueError};
use cinebot::application::messaging::{DispatchOptions, Dispatcher};
use cinebot::application::services::ParticipantRegistry;
use cinebot::domain::entities::{Catalogue, ChatId, MessageId};
use cinebot::domain::traits::{Bot, BotInfo, CatalogueSource, Keyboard};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One outbound call made through the fake bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: ChatId, text: String },
    Keyboard { chat_id: ChatId, text: String, buttons: Keyboard },
    Edit { chat_id: ChatId, message_id: MessageId, text: String, parse_mode: Option<String>, buttons: Option<Keyboard> },
    Answer { callback_id: String },
    Action { chat_id: ChatId, action: String },
}

/// Records every call; sends to chats in `failing` return an error
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
    failing: HashSet<ChatId>,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(ids: &[ChatId]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: ids.iter().copied().collect(),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Everything except typing indicators and callback answers
    pub fn replies(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| !matches!(s, Sent::Action { .. } | Sent::Answer { .. }))
            .collect()
    }

    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id: id, text } if id == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, sent: Sent) -> MessageId {
        let mut log = self.sent.lock().unwrap();
        log.push(sent);
        log.len() as MessageId
    }

    fn check(&self, chat_id: ChatId) -> Result<(), BotError> {
        if self.failing.contains(&chat_id) {
            Err(BotError::Api("Forbidden: bot was blocked by the user".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, BotError> {
        let id = self.push(Sent::Text { chat_id, text: text.to_string() });
        self.check(chat_id)?;
        Ok(id)
    }

    async fn send_with_keyboard(&self, chat_id: ChatId, text: &str, buttons: Keyboard) -> Result<MessageId, BotError> {
        let id = self.push(Sent::Keyboard { chat_id, text: text.to_string(), buttons });
        self.check(chat_id)?;
        Ok(id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        parse_mode: Option<&str>,
        buttons: Option<Keyboard>,
    ) -> Result<(), BotError> {
        self.push(Sent::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            parse_mode: parse_mode.map(str::to_string),
            buttons,
        });
        self.check(chat_id)
    }

    async fn answer_callback(&self, callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        self.push(Sent::Answer { callback_id: callback_id.to_string() });
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: &str) -> Result<(), BotError> {
        self.push(Sent::Action { chat_id, action: action.to_string() });
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "test".to_string(),
            name: "cinebot".to_string(),
            username: "cinebot_test".to_string(),
        }
    }
}

/// Always returns the same catalogue, or always fails
pub struct StaticCatalogue {
    catalogue: Option<Catalogue>,
}

impl StaticCatalogue {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            catalogue: Some(entries.iter().copied().collect()),
        }
    }

    pub fn unavailable() -> Self {
        Self { catalogue: None }
    }
}

#[async_trait]
impl CatalogueSource for StaticCatalogue {
    async fn fetch(&self) -> Result<Catalogue, CatalogueError> {
        self.catalogue
            .clone()
            .ok_or_else(|| CatalogueError::Network("connection refused".to_string()))
    }
}

pub const ADMIN: ChatId = 111;

pub fn movies() -> StaticCatalogue {
    StaticCatalogue::new(&[
        ("Inception 2010", "https://x/1"),
        ("Inception Reloaded", "https://x/2"),
        ("Matrix", "https://x/3"),
    ])
}

pub struct Harness {
    pub bot: Arc<RecordingBot>,
    pub registry: Arc<ParticipantRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

pub fn harness_with(bot: RecordingBot, catalogue: StaticCatalogue, options: DispatchOptions) -> Harness {
    ensure_init();
    let bot = Arc::new(bot);
    let registry = Arc::new(ParticipantRegistry::new());
    let dispatcher = Arc::new(Dispatcher::new(
        bot.clone(),
        Arc::new(catalogue),
        registry.clone(),
        options,
    ));
    Harness { bot, registry, dispatcher }
}

pub fn harness() -> Harness {
    harness_with(RecordingBot::new(), movies(), DispatchOptions::new(ADMIN))
}
