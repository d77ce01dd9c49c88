//! Outbound reply model shared with the transport crates.

use crate::ui_text::{
    CANCEL_LABEL, CATEGORY_LABELS, EDIT_CATEGORY_LABEL, EDIT_DESCRIPTION_LABEL,
    EDIT_IDENTIFIER_LABEL, RESTART_LABEL, SEND_LABEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Reply-keyboard affordance attached to an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever keyboard the user currently sees.
    Keep,
    Cancel,
    Categories,
    Confirm,
    Remove,
}

impl Keyboard {
    /// Button rows for keyboards that show buttons; `None` for `Keep` and `Remove`.
    pub fn button_rows(self) -> Option<Vec<Vec<&'static str>>> {
        match self {
            Self::Keep | Self::Remove => None,
            Self::Cancel => Some(vec![vec![CANCEL_LABEL], vec![RESTART_LABEL]]),
            Self::Categories => Some(CATEGORY_LABELS.iter().map(|label| vec![*label]).collect()),
            Self::Confirm => Some(vec![
                vec![SEND_LABEL],
                vec![EDIT_IDENTIFIER_LABEL, EDIT_CATEGORY_LABEL],
                vec![EDIT_DESCRIPTION_LABEL],
                vec![CANCEL_LABEL],
            ]),
        }
    }

    /// Whether the client should hide the keyboard after one press.
    pub fn one_time(self) -> bool {
        matches!(self, Self::Categories)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn plain(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            keyboard,
        }
    }

    pub fn html(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            keyboard,
        }
    }
}

/// Reply-keyboard presses understood by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Cancel,
    Restart,
    Send,
    EditIdentifier,
    EditCategory,
    EditDescription,
}

impl ControlAction {
    const ALL: [(Self, &'static str); 6] = [
        (Self::Cancel, CANCEL_LABEL),
        (Self::Restart, RESTART_LABEL),
        (Self::Send, SEND_LABEL),
        (Self::EditIdentifier, EDIT_IDENTIFIER_LABEL),
        (Self::EditCategory, EDIT_CATEGORY_LABEL),
        (Self::EditDescription, EDIT_DESCRIPTION_LABEL),
    ];

    /// Matches a button label verbatim or by its wording without the emoji prefix.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Self::ALL.iter().find_map(|(action, label)| {
            (text == *label || text == label_wording(label)).then_some(*action)
        })
    }
}

fn label_wording(label: &str) -> &str {
    label
        .split_once(' ')
        .map(|(_, wording)| wording.trim())
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::{ControlAction, Keyboard};

    #[test]
    fn unit_control_action_parse_accepts_labels_and_bare_wording() {
        assert_eq!(ControlAction::parse("✅ Відправити"), Some(ControlAction::Send));
        assert_eq!(ControlAction::parse("Відправити"), Some(ControlAction::Send));
        assert_eq!(ControlAction::parse(" ❌ Скасувати "), Some(ControlAction::Cancel));
        assert_eq!(ControlAction::parse("Почати заново"), Some(ControlAction::Restart));
        assert_eq!(
            ControlAction::parse("✏️ Змінити опис"),
            Some(ControlAction::EditDescription)
        );
        assert_eq!(
            ControlAction::parse("Змінити номер"),
            Some(ControlAction::EditIdentifier)
        );
    }

    #[test]
    fn regression_control_action_parse_rejects_partial_and_case_variants() {
        assert_eq!(ControlAction::parse("відправити"), None);
        assert_eq!(ControlAction::parse("Змінити"), None);
        assert_eq!(ControlAction::parse("✅"), None);
        assert_eq!(ControlAction::parse(""), None);
    }

    #[test]
    fn unit_keyboard_button_rows_follow_display_layout() {
        let confirm = Keyboard::Confirm.button_rows().expect("confirm rows");
        assert_eq!(confirm.len(), 4);
        assert_eq!(confirm[1].len(), 2);
        let categories = Keyboard::Categories.button_rows().expect("category rows");
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[2], vec!["Колеса / ходова"]);
        assert!(Keyboard::Remove.button_rows().is_none());
        assert!(Keyboard::Categories.one_time());
        assert!(!Keyboard::Confirm.one_time());
    }
}
