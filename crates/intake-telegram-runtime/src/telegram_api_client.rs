//! Telegram Bot API client used by the polling bridge and request delivery.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use intake_flow::{DeliveryError, RecipientChannel};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

const ERROR_BODY_MAX_CHARS: usize = 320;

/// Connection budget for every Bot API call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelegramTimeouts {
    pub connect: Duration,
    pub read: Duration,
    pub write: Duration,
    pub pool: Duration,
}

impl Default for TelegramTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            read: Duration::from_secs(25),
            write: Duration::from_secs(25),
            pool: Duration::from_secs(10),
        }
    }
}

impl TelegramTimeouts {
    /// Upper bound for one request: sending the body plus reading the response.
    fn request_budget(&self) -> Duration {
        self.write.saturating_add(self.read)
    }
}

#[derive(Debug, Deserialize)]
struct TelegramEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TelegramUpdate {
    pub(crate) update_id: i64,
    #[serde(default)]
    pub(crate) message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TelegramMessage {
    pub(crate) chat: TelegramChat,
    #[serde(default)]
    pub(crate) from: Option<TelegramUser>,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TelegramChat {
    pub(crate) id: i64,
    #[serde(rename = "type")]
    pub(crate) kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TelegramUser {
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
}

#[derive(Clone)]
pub struct TelegramApiClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    timeouts: TelegramTimeouts,
}

impl TelegramApiClient {
    pub fn new(api_base: &str, bot_token: &str, timeouts: TelegramTimeouts) -> Result<Self> {
        let bot_token = bot_token.trim();
        if bot_token.is_empty() {
            bail!("telegram bot token cannot be empty");
        }
        let api_base = api_base.trim().trim_end_matches('/');
        if api_base.is_empty() {
            bail!("telegram api base cannot be empty");
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("intake-telegram-bridge"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeouts.connect)
            .pool_idle_timeout(timeouts.pool)
            .build()
            .context("failed to create telegram api client")?;

        Ok(Self {
            http,
            api_base: api_base.to_string(),
            bot_token: bot_token.to_string(),
            timeouts,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Switches the bot to polling, optionally discarding updates queued while offline.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        let request = self
            .http
            .post(self.method_url("deleteWebhook"))
            .timeout(self.timeouts.request_budget())
            .json(&json!({ "drop_pending_updates": drop_pending_updates }));
        self.call::<bool>("deleteWebhook", request)
            .await
            .context("telegram deleteWebhook failed")?;
        Ok(())
    }

    pub(crate) async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout_seconds: u64,
    ) -> Result<Vec<TelegramUpdate>> {
        let mut query = vec![
            ("timeout", poll_timeout_seconds.to_string()),
            ("allowed_updates", "[\"message\"]".to_string()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        let budget = self
            .timeouts
            .request_budget()
            .saturating_add(Duration::from_secs(poll_timeout_seconds));
        let request = self
            .http
            .get(self.method_url("getUpdates"))
            .timeout(budget)
            .query(&query);
        let updates = self
            .call::<Vec<TelegramUpdate>>("getUpdates", request)
            .await
            .context("telegram getUpdates failed")?;
        Ok(updates)
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
        reply_markup: Option<Value>,
    ) -> Result<(), DeliveryError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if let Some(parse_mode) = parse_mode {
            payload["parse_mode"] = Value::String(parse_mode.to_string());
        }
        if let Some(reply_markup) = reply_markup {
            payload["reply_markup"] = reply_markup;
        }
        let request = self
            .http
            .post(self.method_url("sendMessage"))
            .timeout(self.timeouts.request_budget())
            .json(&payload);
        self.call::<Value>("sendMessage", request).await?;
        Ok(())
    }

    async fn call<T>(&self, method: &str, request: reqwest::RequestBuilder) -> Result<T, DeliveryError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;
        let envelope = serde_json::from_str::<TelegramEnvelope<T>>(&body).ok();

        match envelope {
            Some(TelegramEnvelope {
                ok: true,
                result: Some(result),
                ..
            }) if status.is_success() => Ok(result),
            Some(envelope) => Err(DeliveryError::Rejected {
                status: envelope.error_code.unwrap_or(status.as_u16()),
                detail: envelope.description.unwrap_or_else(|| {
                    format!("telegram {method} returned no result")
                }),
            }),
            None => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                detail: truncate_for_error(&body, ERROR_BODY_MAX_CHARS),
            }),
        }
    }
}

#[async_trait]
impl RecipientChannel for TelegramApiClient {
    async fn deliver_html(&self, chat_id: i64, html: &str) -> Result<(), DeliveryError> {
        self.send_message(chat_id, html, Some("HTML"), None).await
    }
}

fn classify_transport_error(error: reqwest::Error) -> DeliveryError {
    if error.is_timeout() {
        DeliveryError::TimedOut(error.to_string())
    } else {
        DeliveryError::Transport(error.to_string())
    }
}

pub(crate) fn truncate_for_error(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use intake_flow::{DeliveryError, RecipientChannel};
    use serde_json::json;

    use super::{truncate_for_error, TelegramApiClient, TelegramTimeouts};

    fn client(base_url: &str) -> TelegramApiClient {
        TelegramApiClient::new(base_url, "123:test", TelegramTimeouts::default()).expect("client")
    }

    #[test]
    fn regression_new_rejects_blank_token_and_base() {
        let error = TelegramApiClient::new("https://api.telegram.org", "   ", TelegramTimeouts::default())
            .err()
            .expect("blank token must fail");
        assert!(error.to_string().contains("token"));
        assert!(TelegramApiClient::new(" / ", "123:test", TelegramTimeouts::default()).is_err());
    }

    #[test]
    fn unit_truncate_for_error_caps_characters() {
        assert_eq!(truncate_for_error("короткий", 20), "короткий");
        assert_eq!(truncate_for_error("абвгд", 3), "абв...");
    }

    #[tokio::test]
    async fn integration_deliver_html_posts_html_message_to_recipient() {
        let server = MockServer::start();
        let send = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:test/sendMessage")
                .body_includes("\"chat_id\":-100500")
                .body_includes("\"parse_mode\":\"HTML\"")
                .body_includes("<b>Нова заявка</b>");
            then.status(200)
                .json_body(json!({"ok": true, "result": {"message_id": 1}}));
        });

        client(&server.base_url())
            .deliver_html(-100500, "<b>Нова заявка</b>")
            .await
            .expect("delivered");
        send.assert();
    }

    #[tokio::test]
    async fn integration_send_message_maps_api_rejection_to_rejected_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/bot123:test/sendMessage");
            then.status(403).json_body(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            }));
        });

        let error = client(&server.base_url())
            .send_message(42, "hi", None, None)
            .await
            .expect_err("rejected");
        match error {
            DeliveryError::Rejected { status, detail } => {
                assert_eq!(status, 403);
                assert!(detail.contains("blocked"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn regression_send_message_classifies_slow_response_as_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/bot123:test/sendMessage");
            then.status(200)
                .delay(Duration::from_millis(800))
                .json_body(json!({"ok": true, "result": {}}));
        });
        let timeouts = TelegramTimeouts {
            read: Duration::from_millis(100),
            write: Duration::from_millis(100),
            ..TelegramTimeouts::default()
        };
        let client =
            TelegramApiClient::new(&server.base_url(), "123:test", timeouts).expect("client");

        let error = client
            .send_message(42, "hi", None, None)
            .await
            .expect_err("timed out");
        assert!(error.is_timeout(), "unexpected error: {error:?}");
    }

    #[tokio::test]
    async fn regression_non_json_error_body_is_reported_as_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/bot123:test/sendMessage");
            then.status(502).body("bad gateway");
        });

        let error = client(&server.base_url())
            .send_message(42, "hi", None, None)
            .await
            .expect_err("rejected");
        assert!(matches!(
            error,
            DeliveryError::Rejected { status: 502, ref detail } if detail == "bad gateway"
        ));
    }

    #[tokio::test]
    async fn integration_get_updates_sends_offset_and_decodes_messages() {
        let server = MockServer::start();
        let poll = server.mock(|when, then| {
            when.method(GET)
                .path("/bot123:test/getUpdates")
                .query_param("offset", "7")
                .query_param("timeout", "0");
            then.status(200).json_body(json!({
                "ok": true,
                "result": [
                    {
                        "update_id": 7,
                        "message": {
                            "message_id": 3,
                            "chat": {"id": 42, "type": "private"},
                            "from": {"id": 42, "is_bot": false, "first_name": "Олена"},
                            "text": "/start"
                        }
                    },
                    {"update_id": 8, "edited_message": {}}
                ]
            }));
        });

        let updates = client(&server.base_url())
            .get_updates(Some(7), 0)
            .await
            .expect("updates");
        poll.assert();
        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().expect("message");
        assert_eq!(message.chat.kind, "private");
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(
            message.from.as_ref().and_then(|user| user.first_name.as_deref()),
            Some("Олена")
        );
        assert!(updates[1].message.is_none());
    }

    #[tokio::test]
    async fn integration_delete_webhook_requests_dropping_pending_updates() {
        let server = MockServer::start();
        let delete = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:test/deleteWebhook")
                .body_includes("\"drop_pending_updates\":true");
            then.status(200).json_body(json!({"ok": true, "result": true}));
        });

        client(&server.base_url())
            .delete_webhook(true)
            .await
            .expect("webhook deleted");
        delete.assert();
    }
}
