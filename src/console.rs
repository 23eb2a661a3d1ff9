use std::sync::Arc;
use tracing::{debug, info};

use crate::ca::provider::{create_console_api, ConsoleApi};
use crate::config::Config;
use crate::controller::{
    DetailOverlay, PreferenceToggle, RequestAttributeAssistant, RevokeFlow, SubmissionConfirmation,
};
use crate::interface::cookie::{CookieJar, CookieStore};
use crate::interface::dialog::{Dialog, DialogResponse};
use crate::interface::navigation::{HttpNavigator, Navigator, Routes};
use crate::telemetry::ConsoleMetrics;
use crate::types::{Instance, Result};

/// The admin console page: all flows wired to one server and one browser
pub struct AdminConsole {
    instance: Instance,
    metrics: Arc<ConsoleMetrics>,
    navigator: Arc<dyn Navigator>,
    overlay: DetailOverlay,
    assistant: RequestAttributeAssistant,
    revoke: RevokeFlow,
    preference: PreferenceToggle,
    submission: SubmissionConfirmation,
}

impl AdminConsole {
    /// Create a console over explicit collaborators
    pub fn new(
        config: &Config,
        api: Arc<dyn ConsoleApi>,
        navigator: Arc<dyn Navigator>,
        cookies: Arc<dyn CookieStore>,
        metrics: Arc<ConsoleMetrics>,
    ) -> Result<Self> {
        let routes = Routes::from_config(config)?;

        Ok(Self {
            instance: config.instance(),
            overlay: DetailOverlay::new(api.clone(), metrics.clone(), config.ui.window_height),
            assistant: RequestAttributeAssistant::new(api, metrics.clone()),
            revoke: RevokeFlow::new(routes.clone(), config.server.revoke_key.clone()),
            preference: PreferenceToggle::new(routes.clone(), cookies),
            submission: SubmissionConfirmation::new(routes),
            navigator,
            metrics,
        })
    }

    /// Create a console talking HTTP to the configured server
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = create_console_api(config)?;
        let cookies: Arc<dyn CookieStore> = Arc::new(CookieJar::new());
        let navigator = Arc::new(HttpNavigator::new(config, cookies.clone())?);
        let metrics = Arc::new(ConsoleMetrics::new()?);

        Self::new(config, api, navigator, cookies, metrics)
    }

    /// Instance the console was opened for
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn metrics(&self) -> &ConsoleMetrics {
        &self.metrics
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    pub fn assistant(&self) -> &RequestAttributeAssistant {
        &self.assistant
    }

    pub fn preference(&self) -> &PreferenceToggle {
        &self.preference
    }

    /// Revocation dialog for a certificate
    pub fn confirm_revoke(&self, serial_number: &str, instance: &Instance) -> Result<Dialog> {
        self.revoke.confirm_revoke(serial_number, instance)
    }

    /// Revocation dialog for the certificate shown in the overlay, if it is revocable
    pub fn revoke_from_overlay(&self) -> Result<Option<Dialog>> {
        match self.overlay.click_revoke() {
            Some(target) => Ok(Some(self.revoke.confirm_target(&target)?)),
            None => Ok(None),
        }
    }

    /// Dialog shown when "send request" is pressed
    pub fn prepare_submission(&self) -> Result<Dialog> {
        self.submission
            .prepare_and_confirm_submission(&self.assistant.fields())
    }

    /// Store the list filter and reload the admin listing, returning its page
    pub async fn apply_valid_certs_filter(&self, instance: &Instance) -> Result<String> {
        let action = self.preference.apply_valid_certs_filter(instance)?;
        self.navigator.perform(&action).await
    }

    /// Resolve a dialog and carry out its action, returning the loaded page
    pub async fn resolve(&self, dialog: &Dialog, response: DialogResponse) -> Result<Option<String>> {
        match dialog.respond(response) {
            Some(action) => {
                info!("Dialog confirmed");
                self.metrics.inc_confirmed_dialogs();
                Ok(Some(self.navigator.perform(&action).await?))
            }
            None => {
                debug!("Dialog dismissed with {:?}", response);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ca::mock::ScriptedConsoleApi;
    use crate::ca::types::{CertDetailPayload, ParseStatus, ParsedRequestAttributes};
    use crate::controller::preference::JUST_VALID_CERTS_COOKIE;
    use crate::interface::navigation::{Action, RecordingNavigator};
    use crate::interface::dialog::DialogKind;
    use tokio_test::assert_ok;
    use url::Url;

    struct Harness {
        console: AdminConsole,
        api: Arc<ScriptedConsoleApi>,
        navigator: Arc<RecordingNavigator>,
        cookies: Arc<CookieJar>,
    }

    fn harness() -> Harness {
        let mut config = Config::default();
        config.server.base_url = "https://ca.example.com/ca".to_string();
        config.server.instance = "rsa".to_string();
        config.server.revoke_key = "k3y".to_string();

        let api = Arc::new(ScriptedConsoleApi::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let cookies = Arc::new(CookieJar::new());
        let console = AdminConsole::new(
            &config,
            api.clone(),
            navigator.clone(),
            cookies.clone(),
            Arc::new(ConsoleMetrics::new().unwrap()),
        )
        .unwrap();

        Harness { console, api, navigator, cookies }
    }

    #[tokio::test]
    async fn test_request_to_submission() {
        let h = harness();
        let attrs = ParsedRequestAttributes {
            cn: Some("Example Org".to_string()),
            o: None,
            ou: None,
            c: Some("US".to_string()),
            org_id: None,
            status: ParseStatus::Valid,
        };
        h.api.on_parse_attributes("-----BEGIN CERTIFICATE REQUEST-----", &attrs).unwrap();

        assert_ok!(h.console.assistant().on_input_change("-----BEGIN CERTIFICATE REQUEST-----").await);
        let dialog = h.console.prepare_submission().unwrap();
        assert_eq!(dialog.kind, DialogKind::Confirm);

        let page = h.console.resolve(&dialog, DialogResponse::Confirm).await.unwrap();
        assert_eq!(page, Some(String::new()));
        match h.navigator.performed().as_slice() {
            [Action::SubmitForm(form)] => {
                assert_eq!(form.action.as_str(), "https://ca.example.com/ca/request")
            }
            other => panic!("unexpected actions {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_overlay_revoke_round_trip() {
        let h = harness();
        let instance = h.console.instance().clone();
        let payload = CertDetailPayload {
            cert_html: "<table/>".to_string(),
            pem: "PEM".to_string(),
        };
        h.api.on_cert("42", &instance, ScriptedConsoleApi::detail_body(&payload).unwrap());

        assert!(h.console.revoke_from_overlay().unwrap().is_none());

        h.console.overlay().show_certificate("42", false, &instance).await.unwrap();
        let dialog = h.console.revoke_from_overlay().unwrap().unwrap();

        assert_eq!(h.console.resolve(&dialog, DialogResponse::Cancel).await.unwrap(), None);
        assert!(h.navigator.performed().is_empty());
        assert_eq!(h.console.metrics().confirmed_dialogs(), 0);

        h.console.resolve(&dialog, DialogResponse::Confirm).await.unwrap();
        assert_eq!(h.console.metrics().confirmed_dialogs(), 1);
        let expected = Url::parse("https://ca.example.com/ca/revoke?instance=rsa&serialNumber=42&revokeKey=k3y").unwrap();
        assert_eq!(h.navigator.performed(), vec![Action::Navigate(expected)]);
    }

    #[tokio::test]
    async fn test_preference_reloads_listing() {
        let h = harness();
        h.console.preference().set_checked(true);

        let instance = h.console.instance().clone();
        h.console.apply_valid_certs_filter(&instance).await.unwrap();

        assert_eq!(h.cookies.get(JUST_VALID_CERTS_COOKIE).unwrap().value, "true");
        let expected = Url::parse("https://ca.example.com/ca/admin?instance=rsa").unwrap();
        assert_eq!(h.navigator.performed(), vec![Action::Navigate(expected)]);
    }
}
