//! Long-polling bridge between the Telegram Bot API and the conversation controller.

use std::time::Duration;

use anyhow::Result;
use intake_flow::ConversationController;

use crate::telegram_api_client::TelegramApiClient;

mod telegram_render_helpers;


use telegram_render_helpers::{inbound_message_from_update, parse_mode_for, reply_markup_for};

/// Runtime configuration for the Telegram bridge loop.
#[derive(Debug, Clone)]
pub struct TelegramBridgeRuntimeConfig {
    pub poll_timeout_seconds: u64,
    pub reconnect_delay: Duration,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PollCycleReport {
    pub received_updates: usize,
    pub handled_messages: usize,
    pub skipped_updates: usize,
    pub sent_replies: usize,
    pub failed_replies: usize,
}

impl PollCycleReport {
    fn has_activity(&self) -> bool {
        self.received_updates > 0 || self.failed_replies > 0
    }
}

/// Runs the bridge until Ctrl-C.
pub async fn run_telegram_bridge(
    config: TelegramBridgeRuntimeConfig,
    client: TelegramApiClient,
    controller: ConversationController,
) -> Result<()> {
    let mut runtime = TelegramBridgeRuntime::new(config, client, controller);
    runtime.run().await
}

struct TelegramBridgeRuntime {
    config: TelegramBridgeRuntimeConfig,
    client: TelegramApiClient,
    controller: ConversationController,
    next_offset: Option<i64>,
}

impl TelegramBridgeRuntime {
    fn new(
        config: TelegramBridgeRuntimeConfig,
        client: TelegramApiClient,
        controller: ConversationController,
    ) -> Self {
        Self {
            config,
            client,
            controller,
            next_offset: None,
        }
    }

    async fn run(&mut self) -> Result<()> {
        if let Err(error) = self.client.delete_webhook(true).await {
            tracing::warn!("could not drop pending updates before polling: {error:#}");
        }
        tracing::info!(
            poll_timeout_seconds = self.config.poll_timeout_seconds,
            "telegram bridge polling started"
        );

        let mut failure_streak = 0_usize;
        loop {
            let result = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("telegram bridge shutdown requested");
                    return Ok(());
                }
                result = self.poll_once() => result,
            };

            match result {
                Ok(report) => {
                    failure_streak = 0;
                    if report.has_activity() {
                        tracing::debug!(
                            received = report.received_updates,
                            handled = report.handled_messages,
                            skipped = report.skipped_updates,
                            sent = report.sent_replies,
                            failed = report.failed_replies,
                            "telegram bridge cycle"
                        );
                    }
                    continue;
                }
                Err(error) => {
                    failure_streak = failure_streak.saturating_add(1);
                    tracing::warn!(failure_streak, "telegram bridge poll failed: {error:#}");
                }
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("telegram bridge shutdown requested");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
            }
        }
    }

    /// Fetches one batch of updates and answers every message in order.
    pub(crate) async fn poll_once(&mut self) -> Result<PollCycleReport> {
        let updates = self
            .client
            .get_updates(self.next_offset, self.config.poll_timeout_seconds)
            .await?;

        let mut report = PollCycleReport::default();
        for update in updates {
            report.received_updates = report.received_updates.saturating_add(1);
            let candidate = update.update_id.saturating_add(1);
            self.next_offset = Some(self.next_offset.map_or(candidate, |offset| offset.max(candidate)));

            let Some(message) = inbound_message_from_update(&update) else {
                report.skipped_updates = report.skipped_updates.saturating_add(1);
                continue;
            };
            report.handled_messages = report.handled_messages.saturating_add(1);

            let replies = self.controller.handle_message(&message).await;
            for reply in replies {
                let sent = self
                    .client
                    .send_message(
                        message.chat_id,
                        &reply.text,
                        parse_mode_for(&reply),
                        reply_markup_for(reply.keyboard),
                    )
                    .await;
                match sent {
                    Ok(()) => report.sent_replies = report.sent_replies.saturating_add(1),
                    Err(error) => {
                        report.failed_replies = report.failed_replies.saturating_add(1);
                        tracing::warn!(
                            chat_id = message.chat_id,
                            "failed to send reply: {error}"
                        );
                    }
                }
            }
        }
        Ok(report)
    }
}
