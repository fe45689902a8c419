//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Matching, participant tracking, broadcast fan-out
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
