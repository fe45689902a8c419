/// Chat identifier as issued by the messaging platform
pub type ChatId = i64;

/// Message identifier, unique within a chat
pub type MessageId = i64;

/// Who sent an inbound event. Only used for log context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub id: Option<i64>,
    pub username: Option<String>,
}

impl Sender {
    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn display_name(&self) -> String {
        match (&self.username, self.id) {
            (Some(name), _) => format!("@{}", name),
            (None, Some(id)) => id.to_string(),
            (None, None) => "unknown".to_string(),
        }
    }
}

/// An inbound chat event, consumed exactly once by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/name arg1 arg2 ...`
    Command {
        name: String,
        args: Vec<String>,
        chat_id: ChatId,
        sender: Sender,
    },
    /// Any non-command text
    Text {
        text: String,
        chat_id: ChatId,
        sender: Sender,
    },
    /// Inline keyboard button carrying callback data
    ButtonPress {
        payload: String,
        chat_id: ChatId,
        callback_id: String,
        message_id: Option<MessageId>,
        sender: Sender,
    },
}

impl InboundEvent {
    pub fn command(chat_id: ChatId, name: impl Into<String>, args: Vec<String>) -> Self {
        Self::Command {
            name: name.into(),
            args,
            chat_id,
            sender: Sender::new(chat_id),
        }
    }

    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            chat_id,
            sender: Sender::new(chat_id),
        }
    }

    pub fn button_press(
        chat_id: ChatId,
        callback_id: impl Into<String>,
        payload: impl Into<String>,
        message_id: Option<MessageId>,
    ) -> Self {
        Self::ButtonPress {
            payload: payload.into(),
            chat_id,
            callback_id: callback_id.into(),
            message_id,
            sender: Sender::new(chat_id),
        }
    }

    pub fn with_sender(mut self, new_sender: Sender) -> Self {
        match &mut self {
            Self::Command { sender, .. }
            | Self::Text { sender, .. }
            | Self::ButtonPress { sender, .. } => *sender = new_sender,
        }
        self
    }

    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Command { chat_id, .. }
            | Self::Text { chat_id, .. }
            | Self::ButtonPress { chat_id, .. } => *chat_id,
        }
    }

    pub fn sender(&self) -> &Sender {
        match self {
            Self::Command { sender, .. }
            | Self::Text { sender, .. }
            | Self::ButtonPress { sender, .. } => sender,
        }
    }

    /// Short label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::Text { .. } => "text",
            Self::ButtonPress { .. } => "button",
        }
    }
}
