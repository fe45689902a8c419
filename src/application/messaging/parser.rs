//! Message parser - Parses raw text into inbound events

use crate::domain::entities::{ChatId, InboundEvent, MessageId, Sender};

/// Parses incoming text into structured events
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
    /// Our own username; commands addressed to any other bot are dropped
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        let username: String = username.into();
        self.bot_username = Some(username.trim_start_matches('@').to_string());
        self
    }

    /// Parse a text message.
    ///
    /// Returns `None` for a command like `/start@other_bot` that names a
    /// different bot than ours.
    pub fn parse(&self, chat_id: ChatId, text: &str, sender: Sender) -> Option<InboundEvent> {
        if let Some(cmd_text) = self.strip_prefix(text) {
            return self.parse_command(chat_id, cmd_text, sender);
        }

        Some(InboundEvent::Text {
            text: text.trim().to_string(),
            chat_id,
            sender,
        })
    }

    /// Parse a callback query (inline button press)
    pub fn parse_callback(
        &self,
        chat_id: ChatId,
        callback_id: impl Into<String>,
        data: impl Into<String>,
        message_id: Option<MessageId>,
        sender: Sender,
    ) -> InboundEvent {
        InboundEvent::button_press(chat_id, callback_id, data, message_id).with_sender(sender)
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        if let Some(rest) = text.strip_prefix('/') {
            return Some(rest);
        }
        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }

    /// Without a known username every mention is accepted
    fn is_addressed_to_us(&self, mention: &str) -> bool {
        match &self.bot_username {
            Some(username) => username.eq_ignore_ascii_case(mention),
            None => true,
        }
    }

    /// Split command and arguments; `/search@MyBot x` names `search`
    fn parse_command(&self, chat_id: ChatId, cmd_text: &str, sender: Sender) -> Option<InboundEvent> {
        let mut parts = cmd_text.split_whitespace();
        let head = parts.next().unwrap_or("");

        let name = match head.split_once('@') {
            Some((name, mention)) => {
                if !self.is_addressed_to_us(mention) {
                    tracing::debug!(chat_id, "Ignoring /{} addressed to @{}", name, mention);
                    return None;
                }
                name
            }
            None => head,
        };
        let args = parts.map(str::to_string).collect();

        Some(InboundEvent::Command {
            name: name.to_lowercase(),
            args,
            chat_id,
            sender,
        })
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}
