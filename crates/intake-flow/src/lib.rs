//! Conversation flow for the vehicle service intake bot.
//!
//! Hosts the per-user state machine that collects an identifier, an issue
//! category and a description, the validators and renderers it relies on,
//! and the dispatcher that forwards completed requests to the recipient chat.
//! Transport crates feed [`InboundMessage`] values in and send the returned
//! [`Reply`] values back out.

pub mod commands;
pub mod composer;
pub mod controller;
pub mod dispatcher;
pub mod reply;
pub mod session;
pub mod ui_text;
pub mod validator;

pub use commands::*;
pub use composer::*;
pub use controller::*;
pub use dispatcher::*;
pub use reply::*;
pub use session::*;
pub use validator::*;
