//! Follow-up actions behind inline buttons
//!
//! [`ActionToken`] is the button's callback data, and [`ActionDispatcher`]
//! turns a clicked token back into a provider call and a rendered payload.

mod dispatcher;
mod token;

pub use dispatcher::ActionDispatcher;
pub use token::{ActionKind, ActionToken, TokenError};
