//! Per-user conversation state machine.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, FixedOffset, Local};
use intake_access::{AccessControl, BanOutcome, UnbanOutcome};

use crate::{
    commands::{
        render_already_banned, render_ban_list, render_banned, render_chat_id,
        render_not_banned, render_unbanned, BotCommand,
    },
    composer::{render_dispatch, render_preview, sender_label, Sender},
    dispatcher::{DispatchStatus, Dispatcher},
    reply::{ControlAction, Keyboard, Reply},
    session::{Session, Step},
    ui_text::{
        ACCESS_DENIED, ASK_CATEGORY, ASK_DESCRIPTION, ASK_IDENTIFIER, ASK_IDENTIFIER_AGAIN,
        BAN_LIST_SAVE_FAILED, BAN_USAGE, CANCELLED, CATEGORY_REPROMPT, CONFIRM_REPROMPT,
        DESCRIPTION_TOO_SHORT, GREETING, HELP_TEXT, IDENTIFIER_WARNING, IDLE_HINT,
        PRIVILEGED_HELP_TEXT, PRIVILEGED_ONLY, REQUEST_FAILED, REQUEST_SENT, RESTARTED,
        UNBAN_USAGE,
    },
    validator::{
        is_description_acceptable, is_known_category, looks_like_identifier,
        normalize_identifier,
    },
};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// One text message received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub sender: Sender,
    pub text: String,
}

pub type Clock = Box<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Owns every in-progress session and turns inbound text into replies.
///
/// Sessions are keyed by sender id. A sender without an entry is idle.
pub struct ConversationController {
    access: Arc<AccessControl>,
    dispatcher: Dispatcher,
    sessions: HashMap<i64, Session>,
    clock: Clock,
}

impl ConversationController {
    pub fn new(access: Arc<AccessControl>, dispatcher: Dispatcher) -> Self {
        Self {
            access,
            dispatcher,
            sessions: HashMap::new(),
            clock: Box::new(|| Local::now().fixed_offset()),
        }
    }

    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn session(&self, user_id: i64) -> Option<&Session> {
        self.sessions.get(&user_id)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Handles one inbound message and returns the replies for its chat, in order.
    pub async fn handle_message(&mut self, message: &InboundMessage) -> Vec<Reply> {
        let user_id = message.sender.id;
        let command = BotCommand::parse(&message.text);

        if message.chat_kind != ChatKind::Private && command != Some(BotCommand::ChatId) {
            return Vec::new();
        }
        if !self.access.is_privileged(user_id) && self.access.is_banned(user_id) {
            tracing::debug!(user_id, "rejected message from banned user");
            return vec![Reply::plain(ACCESS_DENIED, Keyboard::Keep)];
        }

        match command {
            Some(command) => self.handle_command(message, command),
            None => self.handle_text(message).await,
        }
    }

    fn handle_command(&mut self, message: &InboundMessage, command: BotCommand) -> Vec<Reply> {
        let user_id = message.sender.id;
        if command.is_privileged_only() && !self.access.is_privileged(user_id) {
            return vec![Reply::plain(PRIVILEGED_ONLY, Keyboard::Keep)];
        }

        match command {
            BotCommand::Start => {
                self.sessions.insert(user_id, Session::started());
                vec![
                    Reply::plain(GREETING, Keyboard::Cancel),
                    Reply::html(ASK_IDENTIFIER, Keyboard::Cancel),
                ]
            }
            BotCommand::Restart => self.restart(user_id),
            BotCommand::Cancel => self.cancel(user_id),
            BotCommand::Help => {
                let text = if self.access.is_privileged(user_id) {
                    format!("{HELP_TEXT}\n\n{PRIVILEGED_HELP_TEXT}")
                } else {
                    HELP_TEXT.to_string()
                };
                vec![Reply::plain(text, Keyboard::Keep)]
            }
            BotCommand::ChatId => vec![Reply::html(render_chat_id(message.chat_id), Keyboard::Keep)],
            BotCommand::Ban { target: None } => vec![Reply::plain(BAN_USAGE, Keyboard::Keep)],
            BotCommand::Unban { target: None } => vec![Reply::plain(UNBAN_USAGE, Keyboard::Keep)],
            BotCommand::Ban {
                target: Some(target),
            } => {
                let text = match self.access.ban(target) {
                    Ok(BanOutcome::Added) => render_banned(target),
                    Ok(BanOutcome::AlreadyPresent) => render_already_banned(target),
                    Err(error) => {
                        tracing::error!(user_id = target, "failed to persist ban list: {error:#}");
                        BAN_LIST_SAVE_FAILED.to_string()
                    }
                };
                vec![Reply::plain(text, Keyboard::Keep)]
            }
            BotCommand::Unban {
                target: Some(target),
            } => {
                let text = match self.access.unban(target) {
                    Ok(UnbanOutcome::Removed) => render_unbanned(target),
                    Ok(UnbanOutcome::NotPresent) => render_not_banned(target),
                    Err(error) => {
                        tracing::error!(user_id = target, "failed to persist ban list: {error:#}");
                        BAN_LIST_SAVE_FAILED.to_string()
                    }
                };
                vec![Reply::plain(text, Keyboard::Keep)]
            }
            BotCommand::BanList => vec![Reply::plain(
                render_ban_list(&self.access.list_banned()),
                Keyboard::Keep,
            )],
            BotCommand::Unknown(name) => {
                tracing::debug!(user_id, command = %name, "ignoring unknown command");
                Vec::new()
            }
        }
    }

    async fn handle_text(&mut self, message: &InboundMessage) -> Vec<Reply> {
        let user_id = message.sender.id;
        let text = message.text.trim();
        match ControlAction::parse(text) {
            Some(ControlAction::Cancel) => return self.cancel(user_id),
            Some(ControlAction::Restart) => return self.restart(user_id),
            _ => {}
        }

        let Some(session) = self.sessions.get_mut(&user_id) else {
            return vec![Reply::plain(IDLE_HINT, Keyboard::Remove)];
        };
        tracing::debug!(user_id, step = session.step().as_str(), "handling form input");

        match session.step() {
            Step::Idle => {
                tracing::warn!(user_id, "idle session found in store; restarting flow");
                self.restart(user_id)
            }
            Step::Number => {
                let identifier = normalize_identifier(text);
                let plausible = looks_like_identifier(&identifier);
                session.record_identifier(identifier);
                session.go_to(Step::Type);
                let mut replies = Vec::with_capacity(2);
                if !plausible {
                    replies.push(Reply::plain(IDENTIFIER_WARNING, Keyboard::Cancel));
                }
                replies.push(Reply::plain(ASK_CATEGORY, Keyboard::Categories));
                replies
            }
            Step::Type => {
                if !is_known_category(text) {
                    return vec![Reply::plain(CATEGORY_REPROMPT, Keyboard::Categories)];
                }
                session.record_category(text.to_string());
                session.go_to(Step::Description);
                vec![Reply::plain(ASK_DESCRIPTION, Keyboard::Remove)]
            }
            Step::Description => {
                if !is_description_acceptable(text) {
                    return vec![Reply::plain(DESCRIPTION_TOO_SHORT, Keyboard::Keep)];
                }
                session.record_description(text.to_string());
                session.go_to(Step::Confirm);
                vec![Reply::html(render_preview(session), Keyboard::Confirm)]
            }
            Step::Confirm => match ControlAction::parse(text) {
                Some(ControlAction::EditIdentifier) => {
                    session.go_to(Step::Number);
                    vec![Reply::plain(ASK_IDENTIFIER_AGAIN, Keyboard::Cancel)]
                }
                Some(ControlAction::EditCategory) => {
                    session.go_to(Step::Type);
                    vec![Reply::plain(ASK_CATEGORY, Keyboard::Categories)]
                }
                Some(ControlAction::EditDescription) => {
                    session.go_to(Step::Description);
                    vec![Reply::plain(ASK_DESCRIPTION, Keyboard::Remove)]
                }
                Some(ControlAction::Send) => {
                    let created_at = (self.clock)();
                    let rendered =
                        render_dispatch(session, &sender_label(&message.sender), &created_at);
                    self.send(user_id, &rendered).await
                }
                Some(ControlAction::Cancel | ControlAction::Restart) | None => {
                    vec![Reply::plain(CONFIRM_REPROMPT, Keyboard::Confirm)]
                }
            },
        }
    }

    async fn send(&mut self, user_id: i64, rendered: &str) -> Vec<Reply> {
        match self.dispatcher.dispatch(rendered).await {
            DispatchStatus::Delivered => {
                self.sessions.remove(&user_id);
                tracing::info!(user_id, "service request dispatched");
                vec![Reply::plain(REQUEST_SENT, Keyboard::Remove)]
            }
            DispatchStatus::Failed(reason) => {
                tracing::error!(user_id, "failed to dispatch service request: {reason}");
                vec![Reply::plain(REQUEST_FAILED, Keyboard::Confirm)]
            }
            DispatchStatus::Retrying => {
                tracing::error!(user_id, "dispatcher returned before finishing its retry");
                vec![Reply::plain(REQUEST_FAILED, Keyboard::Confirm)]
            }
        }
    }

    fn restart(&mut self, user_id: i64) -> Vec<Reply> {
        self.sessions.insert(user_id, Session::started());
        vec![
            Reply::plain(RESTARTED, Keyboard::Cancel),
            Reply::html(ASK_IDENTIFIER, Keyboard::Cancel),
        ]
    }

    fn cancel(&mut self, user_id: i64) -> Vec<Reply> {
        self.sessions.remove(&user_id);
        vec![Reply::plain(CANCELLED, Keyboard::Remove)]
    }
}
