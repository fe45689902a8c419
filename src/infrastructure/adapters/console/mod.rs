//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::messaging::{Dispatcher, MessageParser};
use crate::domain::entities::{ChatId, MessageId, Sender};
use crate::domain::traits::{Bot, BotInfo, Keyboard};

/// Console bot adapter for local development.
///
/// Every outbound call is printed to stdout; message ids are a local counter.
pub struct ConsoleAdapter {
    info: BotInfo,
    next_id: AtomicI64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "cinebot".to_string(),
                username: "console".to_string(),
            },
            next_id: AtomicI64::new(1),
        }
    }

    fn next_message_id(&self) -> MessageId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn print_keyboard(buttons: &Keyboard) {
        for row in buttons {
            let row_text: Vec<String> = row.iter().map(|b| match (&b.url, &b.callback_data) {
                (Some(url), _) => format!("{} <{}>", b.text, url),
                (None, Some(data)) => format!("{} [{}]", b.text, data),
                (None, None) => b.text.clone(),
            }).collect();
            println!("  [Buttons] {}", row_text.join(" | "));
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, BotError> {
        let id = self.next_message_id();
        println!("[BOT -> {} #{}] {}", chat_id, id, text);
        Ok(id)
    }

    async fn send_with_keyboard(&self, chat_id: ChatId, text: &str, buttons: Keyboard) -> Result<MessageId, BotError> {
        let id = self.next_message_id();
        println!("[BOT -> {} #{}] {}", chat_id, id, text);
        Self::print_keyboard(&buttons);
        Ok(id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        _parse_mode: Option<&str>,
        buttons: Option<Keyboard>,
    ) -> Result<(), BotError> {
        println!("[BOT -> {} #{} edited] {}", chat_id, message_id, text);
        if let Some(buttons) = buttons {
            Self::print_keyboard(&buttons);
        }
        Ok(())
    }

    async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: &str) -> Result<(), BotError> {
        println!("[BOT -> {}] ({}...)", chat_id, action);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Read lines from stdin and dispatch them as if sent from `chat_id`.
///
/// `:press <payload>` simulates an inline button press on the last message.
pub async fn run(dispatcher: &Dispatcher, parser: &MessageParser, chat_id: ChatId) -> Result<(), BotError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut presses: u64 = 0;

    loop {
        print!("> ");
        use std::io::Write;
        let _ = std::io::stdout().flush();

        let Some(input) = lines.next_line().await.map_err(|e| BotError::Internal(e.to_string()))? else {
            return Ok(());
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let event = match input.strip_prefix(":press ") {
            Some(payload) => {
                presses += 1;
                parser.parse_callback(chat_id, format!("console-{}", presses), payload.trim(), None, Sender::new(chat_id))
            }
            None => match parser.parse(chat_id, input, Sender::new(chat_id)) {
                Some(event) => event,
                None => continue,
            },
        };

        if let Err(e) = dispatcher.dispatch(event).await {
            tracing::error!("Failed to handle input: {}", e);
        }
    }
}
