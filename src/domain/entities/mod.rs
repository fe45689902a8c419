//! Domain entities - Core business objects with no external dependencies

pub mod catalogue;
pub mod command;
pub mod event;
pub mod match_result;

pub use catalogue::{Catalogue, CatalogueEntry};
pub use command::BotCommand;
pub use event::{ChatId, InboundEvent, MessageId, Sender};
pub use match_result::MatchResult;
