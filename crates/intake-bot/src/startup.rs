use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use intake_access::{parse_privileged_ids, AccessControl};
use intake_flow::{ConversationController, Dispatcher};
use intake_telegram_runtime::{
    run_telegram_bridge, TelegramApiClient, TelegramBridgeRuntimeConfig, TelegramTimeouts,
};

use crate::cli_args::Cli;

pub(crate) fn resolve_bot_token(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(token) => Ok(token.to_string()),
        None => bail!("BOT_TOKEN is not set; pass --bot-token or set BOT_TOKEN"),
    }
}

/// Blank means no recipient. A non-integer value is logged and also means no recipient.
pub(crate) fn resolve_target_chat(raw: Option<&str>) -> Option<i64> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<i64>() {
        Ok(chat_id) => Some(chat_id),
        Err(_) => {
            tracing::error!(value = raw, "TARGET_CHAT must be an integer chat id");
            None
        }
    }
}

pub(crate) fn telegram_timeouts(cli: &Cli) -> TelegramTimeouts {
    TelegramTimeouts {
        connect: Duration::from_secs_f64(cli.request_connect_timeout),
        read: Duration::from_secs_f64(cli.request_read_timeout),
        write: Duration::from_secs_f64(cli.request_write_timeout),
        pool: Duration::from_secs_f64(cli.request_pool_timeout),
    }
}

pub(crate) async fn run_bot(cli: Cli) -> Result<()> {
    let bot_token = resolve_bot_token(cli.bot_token.as_deref())?;
    let target_chat = resolve_target_chat(cli.target_chat.as_deref());
    if target_chat.is_none() {
        tracing::warn!("no recipient chat configured; completed requests go to stdout");
    }

    let access = Arc::new(AccessControl::load(
        parse_privileged_ids(&cli.admin_ids),
        cli.ban_list_path.clone(),
    ));
    let client = TelegramApiClient::new(&cli.telegram_api_base, &bot_token, telegram_timeouts(&cli))?;
    let dispatcher = Dispatcher::new(target_chat, Arc::new(client.clone()));
    let controller = ConversationController::new(access, dispatcher);

    run_telegram_bridge(
        TelegramBridgeRuntimeConfig {
            poll_timeout_seconds: cli.poll_timeout_seconds,
            reconnect_delay: Duration::from_millis(cli.reconnect_delay_ms),
        },
        client,
        controller,
    )
    .await
}
