//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (InboundEvent, Catalogue, BotCommand)
//! - Traits: Abstractions for infrastructure (Bot, CatalogueSource)

pub mod entities;
pub mod traits;
