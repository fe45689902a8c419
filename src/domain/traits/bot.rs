use async_trait::async_trait;
use crate::domain::entities::{ChatId, MessageId};
use crate::application::errors::BotError;

/// Rows of inline buttons, top to bottom
pub type Keyboard = Vec<Vec<KeyboardButton>>;

/// Bot trait - abstraction for the outbound side of a messaging platform
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a plain text message, returning its id
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, BotError>;

    /// Send a message with inline keyboard
    async fn send_with_keyboard(&self, chat_id: ChatId, text: &str, buttons: Keyboard) -> Result<MessageId, BotError>;

    /// Replace the text (and optionally the keyboard) of a message already sent
    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        parse_mode: Option<&str>,
        buttons: Option<Keyboard>,
    ) -> Result<(), BotError>;

    /// Answer a callback query so the client stops showing a spinner
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError>;

    /// Send chat action (typing, upload_photo, etc.)
    async fn send_chat_action(&self, chat_id: ChatId, action: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keyboard button for inline keyboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: Option<String>,
    pub url: Option<String>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: None,
        }
    }

    pub fn with_callback(mut self, data: impl Into<String>) -> Self {
        self.callback_data = Some(data.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
