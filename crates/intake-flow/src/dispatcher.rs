//! Delivery of completed requests to the recipient chat.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Total delivery attempts for one request: the first try plus one retry on timeout.
pub const MAX_DISPATCH_ATTEMPTS: usize = 2;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery timed out: {0}")]
    TimedOut(String),
    #[error("request rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("delivery transport failed: {0}")]
    Transport(String),
}

impl DeliveryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

/// Sends HTML documents to a fixed chat.
#[async_trait]
pub trait RecipientChannel: Send + Sync {
    async fn deliver_html(&self, chat_id: i64, html: &str) -> Result<(), DeliveryError>;
}

/// Receives rendered requests when no recipient chat is configured.
pub trait FallbackSink: Send + Sync {
    fn emit(&self, rendered: &str);
}

/// Logs a warning and prints the request to stdout.
pub struct StdoutFallbackSink;

impl FallbackSink for StdoutFallbackSink {
    fn emit(&self, rendered: &str) {
        tracing::warn!("no recipient chat configured; printing request to stdout");
        println!("{rendered}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    Delivered,
    Retrying,
    Failed(String),
}

pub struct Dispatcher {
    recipient: Option<i64>,
    channel: Arc<dyn RecipientChannel>,
    fallback: Arc<dyn FallbackSink>,
}

impl Dispatcher {
    pub fn new(recipient: Option<i64>, channel: Arc<dyn RecipientChannel>) -> Self {
        Self {
            recipient,
            channel,
            fallback: Arc::new(StdoutFallbackSink),
        }
    }

    pub fn with_fallback_sink(mut self, fallback: Arc<dyn FallbackSink>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Delivers `rendered` to the recipient, retrying once on a timeout.
    ///
    /// Without a recipient the request goes to the fallback sink and counts as
    /// delivered. The returned status is always `Delivered` or `Failed`.
    pub async fn dispatch(&self, rendered: &str) -> DispatchStatus {
        let Some(recipient) = self.recipient else {
            self.fallback.emit(rendered);
            return DispatchStatus::Delivered;
        };

        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let result = self.channel.deliver_html(recipient, rendered).await;
            match classify_attempt(result, attempt) {
                DispatchStatus::Retrying => {
                    tracing::warn!(recipient, attempt, "request delivery timed out; retrying once");
                }
                status => return status,
            }
        }
    }
}

fn classify_attempt(result: Result<(), DeliveryError>, attempt: usize) -> DispatchStatus {
    match result {
        Ok(()) => DispatchStatus::Delivered,
        Err(error) if error.is_timeout() && attempt < MAX_DISPATCH_ATTEMPTS => {
            DispatchStatus::Retrying
        }
        Err(error) => DispatchStatus::Failed(error.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;

    use super::{DeliveryError, FallbackSink, RecipientChannel};

    /// Replays scripted delivery results and records every attempt.
    #[derive(Default)]
    pub(crate) struct ScriptedChannel {
        script: Mutex<VecDeque<Result<(), DeliveryError>>>,
        pub(crate) deliveries: Mutex<Vec<(i64, String)>>,
    }

    impl ScriptedChannel {
        pub(crate) fn with_script(script: Vec<Result<(), DeliveryError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                deliveries: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn deliveries(&self) -> Vec<(i64, String)> {
            self.deliveries.lock().expect("deliveries lock").clone()
        }
    }

    #[async_trait]
    impl RecipientChannel for ScriptedChannel {
        async fn deliver_html(&self, chat_id: i64, html: &str) -> Result<(), DeliveryError> {
            self.deliveries
                .lock()
                .expect("deliveries lock")
                .push((chat_id, html.to_string()));
            self.script
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingFallback {
        emitted: Mutex<Vec<String>>,
    }

    impl RecordingFallback {
        pub(crate) fn emitted(&self) -> Vec<String> {
            self.emitted.lock().expect("emitted lock").clone()
        }
    }

    impl FallbackSink for RecordingFallback {
        fn emit(&self, rendered: &str) {
            self.emitted
                .lock()
                .expect("emitted lock")
                .push(rendered.to_string());
        }
    }
}
