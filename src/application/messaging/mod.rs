//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{DispatchOptions, Dispatcher};
pub use parser::MessageParser;
