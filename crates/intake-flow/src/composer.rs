//! HTML documents shown to the submitting user and sent to the recipient.

use chrono::{DateTime, TimeZone};
use intake_core::local_timestamp_label;

use crate::{session::Session, ui_text::SEND_LABEL};

const MISSING_FIELD: &str = "-";

/// Public identity details of the user submitting a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Escapes text for interpolation into Telegram HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// `@handle`, else `First Last (id:N)`, else `id:N`.
pub fn sender_label(sender: &Sender) -> String {
    if let Some(username) = sender
        .username
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return format!("@{username}");
    }
    let full_name = [sender.first_name.as_deref(), sender.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if full_name.is_empty() {
        format!("id:{}", sender.id)
    } else {
        format!("{full_name} (id:{})", sender.id)
    }
}

pub fn render_preview(session: &Session) -> String {
    let (identifier, category, description) = escaped_fields(session);
    format!(
        "🧾 <b>Перевірте заявку перед відправкою:</b>\n\
🚗 <b>Авто:</b> <code>{identifier}</code>\n\
📌 <b>Тип:</b> {category}\n\
📝 <b>Опис:</b> {description}\n\n\
Якщо все ок - натисніть <b>{send}</b>.",
        send = escape_html(SEND_LABEL),
    )
}

pub fn render_dispatch<Tz>(session: &Session, sender_label: &str, created_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (identifier, category, description) = escaped_fields(session);
    format!(
        "🛠 <b>Нова заявка</b>\n\
🕒 <b>Час:</b> {created_at}\n\
👤 <b>Від:</b> {sender}\n\
🚗 <b>Авто:</b> <code>{identifier}</code>\n\
📌 <b>Тип:</b> {category}\n\
📝 <b>Опис:</b> {description}",
        created_at = escape_html(&local_timestamp_label(created_at)),
        sender = escape_html(sender_label),
    )
}

fn escaped_fields(session: &Session) -> (String, String, String) {
    (
        escape_html(session.identifier().unwrap_or(MISSING_FIELD)),
        escape_html(session.category().unwrap_or(MISSING_FIELD)),
        escape_html(session.description().unwrap_or(MISSING_FIELD)),
    )
}
