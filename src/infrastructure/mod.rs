//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Catalogue: HTTP catalogue source
//! - Adapters: Platform integrations (Telegram, console)
//! - Webhook: Inbound HTTP surface

pub mod config;
pub mod catalogue;
pub mod adapters;
pub mod webhook;
