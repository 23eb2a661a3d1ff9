use std::fmt;
use serde::{Deserialize, Serialize};

use crate::interface::navigation::Action;

/// Flavour of a modal dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    /// OK/Cancel confirmation
    Confirm,
    /// Blocking message with a single OK button
    Alert,
    /// Dialog with its own button set
    Custom,
}

/// What a dialog button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonRole {
    /// Runs the dialog action
    Confirm,
    /// Closes the dialog
    Cancel,
}

/// A dialog button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub label: String,
    pub class_name: String,
    pub role: ButtonRole,
}

impl DialogButton {
    pub fn new(label: &str, class_name: &str, role: ButtonRole) -> Self {
        Self {
            label: label.to_string(),
            class_name: class_name.to_string(),
            role,
        }
    }
}

/// Labelled attribute shown in a confirmation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRow {
    pub label: String,
    pub value: String,
}

/// Content of a dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogBody {
    /// Markup message with an optional css class
    Message {
        html: String,
        css_class: Option<String>,
    },
    /// Heading followed by an attribute table
    Attributes {
        heading: String,
        rows: Vec<AttributeRow>,
    },
}

/// How the admin dismissed a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    /// Pressed the confirming button
    Confirm,
    /// Pressed the cancel button
    Cancel,
    /// Pressed escape
    Escape,
}

/// Modal dialog presented to the admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: Option<String>,
    pub body: DialogBody,
    pub buttons: Vec<DialogButton>,
    /// Whether the header close button is rendered
    pub close_button: bool,
    /// Whether escape dismisses the dialog
    pub escape_dismisses: bool,
    /// Action run when the confirming button is pressed
    on_confirm: Option<Action>,
}

impl Dialog {
    /// OK/Cancel dialog running `action` on OK
    pub fn confirm(body: DialogBody, action: Action) -> Self {
        Self {
            kind: DialogKind::Confirm,
            title: None,
            body,
            buttons: vec![
                DialogButton::new("Cancel", "btn-secondary", ButtonRole::Cancel),
                DialogButton::new("OK", "btn-primary", ButtonRole::Confirm),
            ],
            close_button: true,
            escape_dismisses: true,
            on_confirm: Some(action),
        }
    }

    /// Blocking message dialog
    pub fn alert(body: DialogBody) -> Self {
        Self {
            kind: DialogKind::Alert,
            title: None,
            body,
            buttons: vec![DialogButton::new("OK", "btn-primary", ButtonRole::Cancel)],
            close_button: true,
            escape_dismisses: true,
            on_confirm: None,
        }
    }

    /// Dialog with explicit buttons
    pub fn custom(
        title: impl Into<String>,
        body: DialogBody,
        buttons: Vec<DialogButton>,
        action: Action,
    ) -> Self {
        Self {
            kind: DialogKind::Custom,
            title: Some(title.into()),
            body,
            buttons,
            close_button: true,
            escape_dismisses: true,
            on_confirm: Some(action),
        }
    }

    pub fn without_close_button(mut self) -> Self {
        self.close_button = false;
        self
    }

    /// Action the confirming button would run
    pub fn pending_action(&self) -> Option<&Action> {
        self.on_confirm.as_ref()
    }

    /// Resolve the dialog, returning the action to carry out if any
    pub fn respond(&self, response: DialogResponse) -> Option<Action> {
        match response {
            DialogResponse::Confirm => self.on_confirm.clone(),
            DialogResponse::Cancel | DialogResponse::Escape => None,
        }
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "== {} ==", title)?;
        }
        match &self.body {
            DialogBody::Message { html, .. } => writeln!(f, "{}", html.replace("<br>", "\n"))?,
            DialogBody::Attributes { heading, rows } => {
                writeln!(f, "{}", heading)?;
                let width = rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
                for row in rows {
                    writeln!(f, "  {:<width$}  {}", row.label, row.value, width = width)?;
                }
            }
        }
        let labels: Vec<String> = self.buttons.iter().map(|b| format!("[{}]", b.label)).collect();
        write!(f, "{}", labels.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn message(text: &str) -> DialogBody {
        DialogBody::Message {
            html: text.to_string(),
            css_class: None,
        }
    }

    #[test]
    fn test_confirm_runs_action_only_on_confirm() {
        let action = Action::Navigate(Url::parse("https://ca.example.com/admin").unwrap());
        let dialog = Dialog::confirm(message("Sure?"), action.clone());

        assert_eq!(dialog.respond(DialogResponse::Confirm), Some(action));
        assert_eq!(dialog.respond(DialogResponse::Cancel), None);
        assert_eq!(dialog.respond(DialogResponse::Escape), None);
    }

    #[test]
    fn test_alert_never_acts() {
        let dialog = Dialog::alert(message("Nope"));
        assert_eq!(dialog.kind, DialogKind::Alert);
        assert!(dialog.pending_action().is_none());
        assert_eq!(dialog.respond(DialogResponse::Confirm), None);
    }

    #[test]
    fn test_display_renders_rows() {
        let body = DialogBody::Attributes {
            heading: "Issue certificate to:".to_string(),
            rows: vec![
                AttributeRow { label: "Common name".to_string(), value: "Example Org".to_string() },
                AttributeRow { label: "Country".to_string(), value: "US".to_string() },
            ],
        };
        let action = Action::Navigate(Url::parse("https://ca.example.com/request").unwrap());
        let text = Dialog::confirm(body, action).to_string();
        assert!(text.starts_with("Issue certificate to:\n"));
        assert!(text.contains("  Common name  Example Org\n"));
        assert!(text.contains("  Country      US\n"));
        assert!(text.ends_with("[Cancel] [OK]"));
    }
}
