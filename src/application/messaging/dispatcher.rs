//! Event dispatcher - Routes inbound events to handlers

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::{find_matches, BroadcastService, ParticipantRegistry};
use crate::domain::entities::{BotCommand, ChatId, InboundEvent, MatchResult, MessageId};
use crate::domain::traits::{Bot, CatalogueSource, Keyboard, KeyboardButton};

/// Callback payload carried by the "About" button
pub const ABOUT_CALLBACK: &str = "about";

pub const WELCOME_MESSAGE: &str = "\tWelcome to the Movie Search Bot! 🎬🍿\n\
Search🔍 for your favorite movies easily!\n\
Type correct movie🍿 name or use the command:\n\
```\n/search <movie_name>\n```\n\
Enjoy your content😎";

pub const ABOUT_MESSAGE: &str = "🤖 *About the Bot*:\n\
This bot allows users to search for movies by name.\n\
*Developer*: [Harsh](https://t.me/Harsh_Raj1)\n\
Use the bot to find movie links and request movies!";

/// `ABOUT_MESSAGE` without Markdown, for chats where it can't be edited in
pub const ABOUT_MESSAGE_PLAIN: &str = "🤖 About the Bot:\n\
This bot allows users to search for movies by name.\n\
Developer: Harsh (https://t.me/Harsh_Raj1)\n\
Use the bot to find movie links and request movies!";

pub const SEARCHING_MESSAGE: &str = "🔍 Searching the movie vaults... 🍿 Hang tight while we find your movie! 🎬";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized! Only the admin can use this command.";
pub const NO_USERS_MESSAGE: &str = "No users have interacted with the bot yet.";

/// Reply for a command that was sent without its required argument
pub fn usage_reply(command: BotCommand) -> String {
    let lead = match command {
        BotCommand::Search => "Please provide a movie name.",
        BotCommand::Broadcast => "Please provide a message to broadcast.",
        BotCommand::Start | BotCommand::UserList => "This command takes no arguments.",
    };
    format!("{} Usage: {}", lead, command.usage())
}

/// Routing switches and the admin identity
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub admin_id: ChatId,
    /// Send a typing indicator and a placeholder, then edit it into the result
    pub loading_placeholder: bool,
    /// Accept `/search <name>` in addition to plain text queries
    pub search_command: bool,
    /// Target of the "Request Movie" button on the welcome message
    pub request_url: String,
}

impl DispatchOptions {
    pub fn new(admin_id: ChatId) -> Self {
        Self {
            admin_id,
            loading_placeholder: true,
            search_command: true,
            request_url: "https://t.me/anonyms_middle_man_bot".to_string(),
        }
    }
}

/// Classifies each inbound event and runs the matching handler
pub struct Dispatcher {
    bot: Arc<dyn Bot>,
    catalogue: Arc<dyn CatalogueSource>,
    registry: Arc<ParticipantRegistry>,
    broadcaster: BroadcastService,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(
        bot: Arc<dyn Bot>,
        catalogue: Arc<dyn CatalogueSource>,
        registry: Arc<ParticipantRegistry>,
        options: DispatchOptions,
    ) -> Self {
        Self {
            broadcaster: BroadcastService::new(bot.clone()),
            bot,
            catalogue,
            registry,
            options,
        }
    }

    /// Handle one event. Errors come only from the outbound transport.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<(), BotError> {
        tracing::debug!(chat_id = event.chat_id(), kind = event.kind(), from = %event.sender().display_name(), "Dispatching event");

        match event {
            InboundEvent::Command { name, args, chat_id, .. } => {
                match BotCommand::from_name(&name) {
                    Some(BotCommand::Start) => self.handle_start(chat_id).await,
                    Some(BotCommand::Search) if self.options.search_command => {
                        self.handle_search_command(chat_id, &args).await
                    }
                    Some(BotCommand::Broadcast) => self.handle_broadcast(chat_id, &args).await,
                    Some(BotCommand::UserList) => self.handle_user_list(chat_id).await,
                    Some(BotCommand::Search) | None => {
                        tracing::debug!(chat_id, "Ignoring unknown command /{}", name);
                        Ok(())
                    }
                }
            }
            InboundEvent::Text { text, chat_id, .. } => self.handle_query(chat_id, &text).await,
            InboundEvent::ButtonPress { payload, chat_id, callback_id, message_id, .. } => {
                self.handle_button(chat_id, &callback_id, &payload, message_id).await
            }
        }
    }

    async fn handle_start(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.registry.record(chat_id).await;

        let keyboard = vec![
            vec![KeyboardButton::new("About🧑‍💻").with_callback(ABOUT_CALLBACK)],
            vec![KeyboardButton::new("Request Movie😇").with_url(self.options.request_url.as_str())],
        ];
        self.bot.send_with_keyboard(chat_id, WELCOME_MESSAGE, keyboard).await?;
        Ok(())
    }

    async fn handle_search_command(&self, chat_id: ChatId, args: &[String]) -> Result<(), BotError> {
        if args.is_empty() {
            self.bot.send_message(chat_id, &usage_reply(BotCommand::Search)).await?;
            return Ok(());
        }
        let query = args.join(" ");
        self.handle_query(chat_id, &query).await
    }

    /// Free-text movie lookup. The sender is recorded before anything is sent.
    async fn handle_query(&self, chat_id: ChatId, query: &str) -> Result<(), BotError> {
        self.registry.record(chat_id).await;

        if let Err(e) = self.bot.send_chat_action(chat_id, "typing").await {
            tracing::debug!(chat_id, "Typing indicator failed: {}", e);
        }

        let placeholder = if self.options.loading_placeholder {
            Some(self.bot.send_message(chat_id, SEARCHING_MESSAGE).await?)
        } else {
            None
        };

        let catalogue = self.catalogue.fetch_or_empty().await;
        let result = find_matches(query, &catalogue);
        tracing::info!(chat_id, query, found = result.is_found(), "Movie search");

        match result {
            MatchResult::Found(entries) => {
                let keyboard: Keyboard = entries
                    .into_iter()
                    .map(|entry| vec![KeyboardButton::new(entry.title).with_url(entry.link)])
                    .collect();
                let text = format!("Search🔍 results for '{}' 🍿 :", query);
                self.reply(chat_id, placeholder, &text, Some(keyboard)).await
            }
            MatchResult::NotFound { hint } => self.reply(chat_id, placeholder, &hint, None).await,
        }
    }

    /// Edit the placeholder if there is one, otherwise send a new message
    async fn reply(
        &self,
        chat_id: ChatId,
        placeholder: Option<MessageId>,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), BotError> {
        match (placeholder, keyboard) {
            (Some(message_id), keyboard) => {
                self.bot.edit_message(chat_id, message_id, text, None, keyboard).await
            }
            (None, Some(keyboard)) => self.bot.send_with_keyboard(chat_id, text, keyboard).await.map(|_| ()),
            (None, None) => self.bot.send_message(chat_id, text).await.map(|_| ()),
        }
    }

    async fn handle_broadcast(&self, chat_id: ChatId, args: &[String]) -> Result<(), BotError> {
        if !self.is_admin(chat_id) {
            tracing::warn!(chat_id, "Unauthorized /broadcast attempt");
            self.bot.send_message(chat_id, UNAUTHORIZED_MESSAGE).await?;
            return Ok(());
        }
        if args.is_empty() {
            self.bot.send_message(chat_id, &usage_reply(BotCommand::Broadcast)).await?;
            return Ok(());
        }

        let text = args.join(" ");
        let recipients = self.registry.snapshot().await;
        let report = self.broadcaster.fan_out(&text, &recipients).await;

        let confirmation = format!(
            "Broadcast sent to {} of {} users.",
            report.delivered, report.attempted
        );
        self.bot.send_message(chat_id, &confirmation).await?;
        Ok(())
    }

    async fn handle_user_list(&self, chat_id: ChatId) -> Result<(), BotError> {
        if !self.is_admin(chat_id) {
            tracing::warn!(chat_id, "Unauthorized /userlist attempt");
            self.bot.send_message(chat_id, UNAUTHORIZED_MESSAGE).await?;
            return Ok(());
        }

        let ids = self.registry.snapshot().await;
        let text = if ids.is_empty() {
            NO_USERS_MESSAGE.to_string()
        } else {
            ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join("\n")
        };
        self.bot.send_message(chat_id, &text).await?;
        Ok(())
    }

    async fn handle_button(
        &self,
        chat_id: ChatId,
        callback_id: &str,
        payload: &str,
        message_id: Option<MessageId>,
    ) -> Result<(), BotError> {
        // Always acknowledge so the client drops its loading indicator
        if let Err(e) = self.bot.answer_callback(callback_id, None).await {
            tracing::warn!(chat_id, "Failed to answer callback: {}", e);
        }

        if payload != ABOUT_CALLBACK {
            tracing::debug!(chat_id, payload, "Ignoring unknown callback");
            return Ok(());
        }

        match message_id {
            Some(message_id) => {
                self.bot
                    .edit_message(chat_id, message_id, ABOUT_MESSAGE, Some("Markdown"), None)
                    .await
            }
            // Inline-mode callbacks carry no message to edit
            None => self.bot.send_message(chat_id, ABOUT_MESSAGE_PLAIN).await.map(|_| ()),
        }
    }

    fn is_admin(&self, chat_id: ChatId) -> bool {
        chat_id == self.options.admin_id
    }
}
