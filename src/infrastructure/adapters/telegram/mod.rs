//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{BotCommand, ChatId, InboundEvent, MessageId, Sender};
use crate::domain::traits::{Bot, BotInfo, Keyboard};

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        let sender = Sender::new(user.id);
        match &user.username {
            Some(name) => sender.with_username(name.as_str()),
            None => sender,
        }
    }
}

impl Update {
    /// Convert into a dispatcher event.
    ///
    /// Messages without text (stickers, photos, joins) and callbacks without
    /// data yield `None`.
    pub fn into_event(self, parser: &MessageParser) -> Option<InboundEvent> {
        if let Some(msg) = self.message {
            let text = msg.text?;
            let sender = msg.from.as_ref().map(Sender::from).unwrap_or_default();
            return parser.parse(msg.chat.id, &text, sender);
        }

        if let Some(cb) = self.callback_query {
            let data = cb.data?;
            let sender = Sender::from(&cb.from);
            // Callbacks from inline-mode messages carry no message; reply to the presser
            let (chat_id, message_id) = match &cb.message {
                Some(m) => (m.chat.id, Some(m.message_id)),
                None => (cb.from.id, None),
            };
            return Some(parser.parse_callback(chat_id, cb.id, data, message_id, sender));
        }

        None
    }
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl From<Keyboard> for InlineKeyboardMarkup {
    fn from(buttons: Keyboard) -> Self {
        let inline_keyboard = buttons.into_iter().map(|row| {
            row.into_iter().map(|btn| InlineKeyboardButton {
                text: btn.text,
                callback_data: btn.callback_data,
                url: btn.url,
            }).collect()
        }).collect();
        Self { inline_keyboard }
    }
}

/// Bot API envelope: `{"ok": bool, "result": ..., "description": ...}`
#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct MessageResult {
    message_id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            token: token.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "cinebot".to_string(),
                username: "cinebot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// POST a JSON request and unwrap the Bot API envelope
    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, BotError>
    where
        Req: Serialize + ?Sized + Sync,
        Res: DeserializeOwned + Send,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let data: ApiResponse<Res> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e)))?;

        if !data.ok {
            let description = data.description.unwrap_or_else(|| status.to_string());
            return Err(BotError::Api(format!("{}: {}", method, description)));
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{}: missing result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: &'static str,
            description: &'static str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let request = SetMyCommandsRequest {
            commands: BotCommand::public()
                .map(|c| Command { command: c.name(), description: c.description() })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request).await?;
        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }

    /// Point Telegram at `{public_url}/{token}`
    pub async fn set_webhook(&self, public_url: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SetWebhookRequest {
            url: String,
            allowed_updates: Vec<&'static str>,
        }

        let request = SetWebhookRequest {
            url: format!("{}/{}", public_url.trim_end_matches('/'), self.token),
            allowed_updates: vec!["message", "callback_query"],
        };

        let _: bool = self.call("setWebhook", &request).await?;
        tracing::info!("Webhook registered at {}/<token>", public_url.trim_end_matches('/'));
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: ChatId,
            text: &'a str,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);
        let result: MessageResult = self.call("sendMessage", &SendMessageRequest { chat_id, text }).await?;
        Ok(result.message_id)
    }

    async fn send_with_keyboard(&self, chat_id: ChatId, text: &str, buttons: Keyboard) -> Result<MessageId, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: ChatId,
            text: &'a str,
            reply_markup: InlineKeyboardMarkup,
        }

        tracing::debug!("Sending with keyboard to {}: {}", chat_id, text);
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup: buttons.into(),
        };
        let result: MessageResult = self.call("sendMessage", &request).await?;
        Ok(result.message_id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        parse_mode: Option<&str>,
        buttons: Option<Keyboard>,
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct EditMessageTextRequest<'a> {
            chat_id: ChatId,
            message_id: MessageId,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        let request = EditMessageTextRequest {
            chat_id,
            message_id,
            text,
            parse_mode,
            reply_markup: buttons.map(Into::into),
        };

        // Returns the edited Message, or `true` for inline messages
        let _: serde_json::Value = self.call("editMessageText", &request).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
        }

        let _: bool = self.call("answerCallbackQuery", &AnswerRequest { callback_query_id: callback_id, text }).await?;
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest<'a> {
            chat_id: ChatId,
            action: &'a str,
        }

        let _: bool = self.call("sendChatAction", &SendChatActionRequest { chat_id, action }).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
