//! Bot runtime
//!
//! Shared state, the update dispatcher and its handlers, and the daily
//! reset scheduler.

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod scheduler;
pub mod state;

pub use dispatcher::Dispatcher;
pub use error::{HandlerError, HandlerResult};
pub use state::BotState;
