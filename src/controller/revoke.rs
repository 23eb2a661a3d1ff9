use tracing::info;

use crate::interface::dialog::{ButtonRole, Dialog, DialogBody, DialogButton};
use crate::interface::navigation::{Action, Routes};
use crate::types::{Instance, Result, RevokeTarget};

pub const REVOKE_TITLE: &str = "Revoke certificate";
pub const REVOKE_WARNING: &str =
    "Are you sure you want to revoke this certificate.<br> This action cannot be undone!";

/// Builds the revocation confirmation for a certificate
pub struct RevokeFlow {
    routes: Routes,
    /// Authorization token carried by the revoke navigation
    revoke_key: String,
}

impl RevokeFlow {
    pub fn new(routes: Routes, revoke_key: impl Into<String>) -> Self {
        Self {
            routes,
            revoke_key: revoke_key.into(),
        }
    }

    /// Confirmation dialog whose "Revoke" button navigates to the revoke endpoint
    pub fn confirm_revoke(&self, serial_number: &str, instance: &Instance) -> Result<Dialog> {
        info!("Asking to confirm revocation of {} in {}", serial_number, instance);

        let url = self.routes.revoke(instance, serial_number, &self.revoke_key)?;
        let body = DialogBody::Message {
            html: REVOKE_WARNING.to_string(),
            css_class: Some("revoke-warning".to_string()),
        };
        let buttons = vec![
            DialogButton::new("Revoke", "btn-danger", ButtonRole::Confirm),
            DialogButton::new("Cancel", "btn-primary", ButtonRole::Cancel),
        ];

        Ok(Dialog::custom(REVOKE_TITLE, body, buttons, Action::Navigate(url)).without_close_button())
    }

    /// Confirmation dialog for the certificate bound to the overlay
    pub fn confirm_target(&self, target: &RevokeTarget) -> Result<Dialog> {
        self.confirm_revoke(&target.serial_number, &target.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::dialog::{DialogKind, DialogResponse};
    use url::Url;

    fn flow() -> RevokeFlow {
        let routes = Routes::new(Url::parse("https://ca.example.com/ca/").unwrap(), "request");
        RevokeFlow::new(routes, "k3y")
    }

    #[test]
    fn test_revoke_dialog_layout() {
        let dialog = flow().confirm_revoke("0a1b", &Instance::new("rsa")).unwrap();

        assert_eq!(dialog.kind, DialogKind::Custom);
        assert_eq!(dialog.title.as_deref(), Some(REVOKE_TITLE));
        assert!(!dialog.close_button);
        assert!(dialog.escape_dismisses);
        assert_eq!(dialog.buttons[0].label, "Revoke");
        assert_eq!(dialog.buttons[0].class_name, "btn-danger");
        assert_eq!(dialog.buttons[1].label, "Cancel");
        match &dialog.body {
            DialogBody::Message { html, css_class } => {
                assert!(html.contains("cannot be undone"));
                assert_eq!(css_class.as_deref(), Some("revoke-warning"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_confirm_navigates_with_key() {
        let dialog = flow().confirm_revoke("0a1b", &Instance::new("rsa")).unwrap();

        let expected = Url::parse(
            "https://ca.example.com/ca/revoke?instance=rsa&serialNumber=0a1b&revokeKey=k3y",
        )
        .unwrap();
        assert_eq!(dialog.respond(DialogResponse::Confirm), Some(Action::Navigate(expected)));
        assert_eq!(dialog.respond(DialogResponse::Cancel), None);
        assert_eq!(dialog.respond(DialogResponse::Escape), None);
    }

    #[test]
    fn test_confirm_target() {
        let target = RevokeTarget {
            serial_number: "ff".to_string(),
            instance: Instance::new("ecc"),
        };
        let dialog = flow().confirm_target(&target).unwrap();
        match dialog.pending_action() {
            Some(Action::Navigate(url)) => {
                assert_eq!(url.query(), Some("instance=ecc&serialNumber=ff&revokeKey=k3y"))
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
