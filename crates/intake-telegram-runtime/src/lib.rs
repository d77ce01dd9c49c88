//! Telegram Bot API transport for the intake bot.
//!
//! Long-polls `getUpdates`, hands each private text message to the
//! conversation controller and posts the replies back with `sendMessage`.
//! The same API client delivers finished requests to the recipient chat.

pub mod telegram_api_client;
pub mod telegram_runtime;

pub use telegram_api_client::{TelegramApiClient, TelegramTimeouts};
pub use telegram_runtime::{run_telegram_bridge, TelegramBridgeRuntimeConfig};
