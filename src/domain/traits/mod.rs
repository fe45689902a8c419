//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod catalogue;

pub use bot::{Bot, BotInfo, Keyboard, KeyboardButton};
pub use catalogue::CatalogueSource;
