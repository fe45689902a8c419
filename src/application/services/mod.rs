//! Application services - Business logic orchestration

pub mod broadcast;
pub mod matcher;
pub mod registry;

pub use broadcast::{BroadcastReport, BroadcastService};
pub use matcher::{find_matches, NOT_FOUND_HINT};
pub use registry::ParticipantRegistry;
