//! Conversions between Bot API payloads and the conversation model.

use intake_flow::{ChatKind, InboundMessage, Keyboard, Reply, Sender, TextFormat};
use serde_json::{json, Value};

use crate::telegram_api_client::TelegramUpdate;

pub(super) fn parse_mode_for(reply: &Reply) -> Option<&'static str> {
    match reply.format {
        TextFormat::Plain => None,
        TextFormat::Html => Some("HTML"),
    }
}

/// `reply_markup` for a reply keyboard; `None` leaves the current keyboard alone.
pub(super) fn reply_markup_for(keyboard: Keyboard) -> Option<Value> {
    if keyboard == Keyboard::Remove {
        return Some(json!({ "remove_keyboard": true }));
    }
    let rows = keyboard.button_rows()?;
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|label| json!({ "text": label }))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    Some(json!({
        "keyboard": rows,
        "resize_keyboard": true,
        "one_time_keyboard": keyboard.one_time(),
    }))
}

/// Text messages with a known sender become controller input; everything else is skipped.
pub(super) fn inbound_message_from_update(update: &TelegramUpdate) -> Option<InboundMessage> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    let from = message.from.as_ref()?;
    let chat_kind = if message.chat.kind == "private" {
        ChatKind::Private
    } else {
        ChatKind::Group
    };
    Some(InboundMessage {
        chat_id: message.chat.id,
        chat_kind,
        sender: Sender {
            id: from.id,
            username: from.username.clone(),
            first_name: from.first_name.clone(),
            last_name: from.last_name.clone(),
        },
        text: text.to_string(),
    })
}
