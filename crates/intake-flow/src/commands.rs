//! Slash-command parsing and the texts produced by moderation commands.

use intake_access::BAN_LIST_DISPLAY_LIMIT;

use crate::ui_text::BAN_LIST_EMPTY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Cancel,
    Restart,
    ChatId,
    /// `target` is `None` when the argument is missing or not an integer.
    Ban { target: Option<i64> },
    Unban { target: Option<i64> },
    BanList,
    Unknown(String),
}

impl BotCommand {
    /// Parses `/name`, `/name@botname` and `/name args`. Returns `None` for
    /// text that does not start with a slash command.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let mut pieces = trimmed.splitn(2, char::is_whitespace);
        let head = pieces.next()?.strip_prefix('/')?;
        let remainder = pieces.next().unwrap_or_default().trim();
        let name = head.split_once('@').map_or(head, |(name, _)| name);
        if name.is_empty() {
            return None;
        }

        let parsed = match name {
            "start" => Self::Start,
            "help" => Self::Help,
            "cancel" => Self::Cancel,
            "restart" => Self::Restart,
            "chatid" => Self::ChatId,
            "ban" => Self::Ban {
                target: parse_user_id_arg(remainder),
            },
            "unban" => Self::Unban {
                target: parse_user_id_arg(remainder),
            },
            "banlist" => Self::BanList,
            other => Self::Unknown(other.to_string()),
        };
        Some(parsed)
    }

    pub fn is_privileged_only(&self) -> bool {
        matches!(self, Self::Ban { .. } | Self::Unban { .. } | Self::BanList)
    }
}

fn parse_user_id_arg(remainder: &str) -> Option<i64> {
    remainder.split_whitespace().next()?.parse::<i64>().ok()
}

pub fn render_chat_id(chat_id: i64) -> String {
    format!("Chat ID: <code>{chat_id}</code>")
}

pub fn render_banned(id: i64) -> String {
    format!("Користувача {id} заблоковано.")
}

pub fn render_already_banned(id: i64) -> String {
    format!("Користувач {id} вже у блок-листі.")
}

pub fn render_unbanned(id: i64) -> String {
    format!("Користувача {id} розблоковано.")
}

pub fn render_not_banned(id: i64) -> String {
    format!("Користувач {id} не був у блок-листі.")
}

/// Header with the full count, then at most [`BAN_LIST_DISPLAY_LIMIT`] ids.
pub fn render_ban_list(ids: &[i64]) -> String {
    if ids.is_empty() {
        return BAN_LIST_EMPTY.to_string();
    }
    let lines = ids
        .iter()
        .take(BAN_LIST_DISPLAY_LIMIT)
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    let suffix = if ids.len() > BAN_LIST_DISPLAY_LIMIT {
        "\n..."
    } else {
        ""
    };
    format!("Заблоковані ID ({}):\n{lines}{suffix}", ids.len())
}
