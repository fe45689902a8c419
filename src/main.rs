use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use cinebot::application::errors::{BotError, ConfigError};
use cinebot::application::messaging::{Dispatcher, MessageParser};
use cinebot::application::services::ParticipantRegistry;
use cinebot::domain::traits::Bot;
use cinebot::infrastructure::adapters::{console, ConsoleAdapter, TelegramAdapter};
use cinebot::infrastructure::catalogue::HttpCatalogueSource;
use cinebot::infrastructure::config::Config;
use cinebot::infrastructure::webhook::{self, WebhookState};

#[derive(Parser)]
#[command(name = "cinebot")]
#[command(about = "Movie lookup bot served over a Telegram webhook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Run,
    /// Chat with the bot from the terminal as the admin
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Console => run_console(&cli.config, cli.token),
        Commands::Version => {
            println!("cinebot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// File config (when present) with environment and CLI overrides on top
fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, ConfigError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path)?
    } else {
        tracing::info!("No config file at {}, using defaults and environment", config_path);
        Config::default()
    };

    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }

    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, token_override)?;
    let required = config.validate()?;

    tracing::info!("Starting {}", config.bot.name);
    tracing::info!("  Admin: {}", required.admin_id);
    tracing::info!("  Catalogue: {}", required.catalogue_url);

    runtime()?.block_on(async {
        let mut bot = TelegramAdapter::with_api_base(&required.token, &config.telegram.api_base);

        let mut parser = MessageParser::new(&config.bot.prefix);
        match bot.fetch_bot_info().await {
            Ok(()) => parser = parser.with_bot_username(bot.bot_info().username),
            Err(e) => tracing::warn!("Failed to fetch bot info, accepting commands for any @mention: {}", e),
        }
        tracing::info!("Bot started: @{}", bot.bot_info().username);

        if let Err(e) = bot.register_commands().await {
            tracing::warn!("Failed to register commands: {}", e);
        }

        if let Some(public_url) = &config.server.public_url {
            if let Err(e) = bot.set_webhook(public_url).await {
                tracing::warn!("Failed to register webhook: {}", e);
            }
        }

        let bot: Arc<dyn Bot> = Arc::new(bot);
        let parser = Arc::new(parser);
        let dispatcher = Arc::new(Dispatcher::new(
            bot,
            Arc::new(HttpCatalogueSource::new(&required.catalogue_url)),
            Arc::new(ParticipantRegistry::new()),
            config.dispatch_options(required.admin_id),
        ));

        let app = webhook::router(&required.token, WebhookState { dispatcher, parser });
        webhook::serve(&config.bind_address(), app).await
    })
}

fn run_console(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, token_override)?;
    let catalogue_url = config.catalogue.url.clone()
        .ok_or_else(|| ConfigError::MissingField("catalogue.url (JSON_URL)".to_string()))?;
    // The console user is always the admin so every command can be tried
    let admin_id = config.telegram.admin_id.unwrap_or(1);

    runtime()?.block_on(async {
        let bot: Arc<dyn Bot> = Arc::new(ConsoleAdapter::new());
        let parser = MessageParser::new(&config.bot.prefix);
        let dispatcher = Dispatcher::new(
            bot,
            Arc::new(HttpCatalogueSource::new(catalogue_url)),
            Arc::new(ParticipantRegistry::new()),
            config.dispatch_options(admin_id),
        );

        tracing::info!("Console mode, chatting as {}. Use :press <payload> for buttons.", admin_id);
        console::run(&dispatcher, &parser, admin_id).await
    })
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
