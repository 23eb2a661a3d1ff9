use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::ca::provider::ConsoleApi;
use crate::ca::types::{ParseStatus, ParsedRequestAttributes};
use crate::controller::form::{RequestField, RequestFields, RequestFormView};
use crate::error::Error;
use crate::telemetry::ConsoleMetrics;
use crate::types::Result;

/// Message shown when the parse endpoint could not be reached
pub const SERVER_CONNECTION_ERROR: &str = "Server connection error";

/// What happened to the response of one input change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The parse result was rendered into the form
    Applied(ParseStatus),
    /// The server could not be reached
    ConnectionError,
    /// A newer input change was issued, the response was dropped
    Superseded,
}

/// Fills the request form from the server's parse of the raw request
///
/// Every input change sends its own request. Requests are numbered and a
/// response is only rendered if no newer request has been issued since.
pub struct RequestAttributeAssistant {
    api: Arc<dyn ConsoleApi>,
    metrics: Arc<ConsoleMetrics>,
    /// Sequence number of the latest issued request
    issued: AtomicU64,
    form: Mutex<RequestFormView>,
}

impl RequestAttributeAssistant {
    pub fn new(api: Arc<dyn ConsoleApi>, metrics: Arc<ConsoleMetrics>) -> Self {
        Self {
            api,
            metrics,
            issued: AtomicU64::new(0),
            form: Mutex::new(RequestFormView::new()),
        }
    }

    /// Snapshot of the form state
    pub fn form(&self) -> RequestFormView {
        self.form.lock().unwrap().clone()
    }

    /// Current attribute values
    pub fn fields(&self) -> RequestFields {
        self.form.lock().unwrap().fields.clone()
    }

    /// Manual edit of an attribute input
    pub fn set_field(&self, field: RequestField, value: impl Into<String>) {
        self.form.lock().unwrap().fields.set(field, value);
    }

    /// Handle a change of the raw request input
    ///
    /// Malformed response bodies are returned as errors and leave the form
    /// untouched.
    pub async fn on_input_change(&self, text: &str) -> Result<ApplyOutcome> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.form.lock().unwrap().input_text = text.to_string();
        self.metrics.inc_parse_requests();
        debug!("Parse request #{} ({} chars)", seq, text.len());

        let response = self.api.process_cert_req_data(text).await;

        let mut form = self.form.lock().unwrap();
        if seq != self.issued.load(Ordering::SeqCst) {
            debug!("Dropping parse response #{}, superseded", seq);
            self.metrics.inc_stale_responses();
            return Ok(ApplyOutcome::Superseded);
        }

        let body = match response {
            Ok(Some(body)) => body,
            Ok(None) => {
                warn!("Parse request #{} returned no body", seq);
                return Ok(self.connection_error(&mut form));
            }
            Err(e) => {
                warn!("Parse request #{} failed: {}", seq, e);
                return Ok(self.connection_error(&mut form));
            }
        };

        let attrs: ParsedRequestAttributes = serde_json::from_str(&body)
            .map_err(|e| Error::Serialization(format!("Invalid parse result: {}", e)))?;
        apply_parse_result(&mut form, &attrs);

        Ok(ApplyOutcome::Applied(attrs.status))
    }

    fn connection_error(&self, form: &mut RequestFormView) -> ApplyOutcome {
        self.metrics.inc_transport_failures();
        form.show_message(SERVER_CONNECTION_ERROR);
        form.submit_enabled = false;
        ApplyOutcome::ConnectionError
    }
}

/// Render a parse result: message, submit button and the five attribute inputs
pub fn apply_parse_result(form: &mut RequestFormView, attrs: &ParsedRequestAttributes) {
    match &attrs.status {
        ParseStatus::Empty => {
            form.clear_message();
            form.submit_enabled = false;
        }
        ParseStatus::Invalid(message) => {
            form.show_message(message.clone());
            form.submit_enabled = false;
        }
        ParseStatus::Valid => {
            form.clear_message();
            form.submit_enabled = true;
        }
    }
    form.fields.fill_from(attrs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ca::mock::{ScriptedConsoleApi, ScriptedResponse};
    use crate::ca::provider::MockConsoleApi;
    use crate::telemetry::logging::init_test_logging;
    use crate::types::Visibility;

    fn attrs(cn: Option<&str>, c: Option<&str>, status: ParseStatus) -> ParsedRequestAttributes {
        ParsedRequestAttributes {
            cn: cn.map(str::to_string),
            o: None,
            ou: None,
            c: c.map(str::to_string),
            org_id: None,
            status,
        }
    }

    #[test]
    fn test_initial_state() {
        let form = RequestFormView::new();
        assert_eq!(form.message_visibility, Visibility::Hidden);
        assert!(!form.submit_enabled);
        assert_eq!(form.fields, RequestFields::default());
    }

    #[test]
    fn test_apply_three_way_status() {
        let mut form = RequestFormView::new();

        apply_parse_result(&mut form, &attrs(Some("Example Org"), Some("US"), ParseStatus::Valid));
        assert!(form.submit_enabled);
        assert_eq!(form.message, "");
        assert_eq!(form.message_visibility, Visibility::Hidden);

        let bad = ParseStatus::Invalid("Bad signature on request".to_string());
        apply_parse_result(&mut form, &attrs(None, None, bad));
        assert!(!form.submit_enabled);
        assert_eq!(form.message, "Bad signature on request");
        assert_eq!(form.message_visibility, Visibility::Shown);
        assert_eq!(form.fields.common_name, "");

        apply_parse_result(&mut form, &attrs(None, None, ParseStatus::Empty));
        assert!(!form.submit_enabled);
        assert_eq!(form.message, "");
        assert_eq!(form.message_visibility, Visibility::Hidden);
    }

    #[tokio::test]
    async fn test_valid_parse_fills_form() {
        init_test_logging();
        let api = ScriptedConsoleApi::new();
        api.on_parse_attributes("csr", &attrs(Some("Example Org"), Some("US"), ParseStatus::Valid))
            .unwrap();
        let assistant = RequestAttributeAssistant::new(Arc::new(api), Arc::new(ConsoleMetrics::new().unwrap()));
        assistant.set_field(RequestField::OrgUnitName, "typed by hand");

        let outcome = assistant.on_input_change("csr").await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Applied(ParseStatus::Valid));
        let form = assistant.form();
        assert_eq!(form.input_text, "csr");
        assert!(form.submit_enabled);
        assert_eq!(form.fields.common_name, "Example Org");
        assert_eq!(form.fields.country, "US");
        assert_eq!(form.fields.org_unit_name, "");
    }

    #[tokio::test]
    async fn test_connection_error_keeps_fields() {
        let api = ScriptedConsoleApi::new();
        api.on_parse_attributes("good", &attrs(Some("Example Org"), Some("US"), ParseStatus::Valid))
            .unwrap();
        api.on_parse("down", ScriptedResponse::Fail);
        let assistant = RequestAttributeAssistant::new(Arc::new(api), Arc::new(ConsoleMetrics::new().unwrap()));

        assistant.on_input_change("good").await.unwrap();
        let before = assistant.fields();

        let outcome = assistant.on_input_change("down").await.unwrap();
        assert_eq!(outcome, ApplyOutcome::ConnectionError);

        let form = assistant.form();
        assert_eq!(form.fields, before);
        assert_eq!(form.message, SERVER_CONNECTION_ERROR);
        assert_eq!(form.message_visibility, Visibility::Shown);
        assert!(!form.submit_enabled);
    }

    #[tokio::test]
    async fn test_null_body_is_connection_error() {
        let mut api = MockConsoleApi::new();
        api.expect_process_cert_req_data()
            .times(1)
            .returning(|_| Ok(None));
        let assistant = RequestAttributeAssistant::new(Arc::new(api), Arc::new(ConsoleMetrics::new().unwrap()));

        let outcome = assistant.on_input_change("anything").await.unwrap();
        assert_eq!(outcome, ApplyOutcome::ConnectionError);
        assert_eq!(assistant.form().message, SERVER_CONNECTION_ERROR);
    }

    #[tokio::test]
    async fn test_scripted_null_body_is_connection_error() {
        let api = ScriptedConsoleApi::new();
        api.on_parse("gone", ScriptedResponse::Body("null".to_string()));
        let assistant = RequestAttributeAssistant::new(Arc::new(api), Arc::new(ConsoleMetrics::new().unwrap()));

        let outcome = assistant.on_input_change("gone").await.unwrap();
        assert_eq!(outcome, ApplyOutcome::ConnectionError);
        let form = assistant.form();
        assert_eq!(form.message, SERVER_CONNECTION_ERROR);
        assert_eq!(form.message_visibility, Visibility::Shown);
        assert!(!form.submit_enabled);
    }

    #[tokio::test]
    async fn test_malformed_body_leaves_form() {
        let api = ScriptedConsoleApi::new();
        api.on_parse("x", ScriptedResponse::Body("not json".to_string()));
        let assistant = RequestAttributeAssistant::new(Arc::new(api), Arc::new(ConsoleMetrics::new().unwrap()));

        let err = assistant.on_input_change("x").await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(assistant.form().message_visibility, Visibility::Hidden);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        init_test_logging();
        let api = Arc::new(ScriptedConsoleApi::new());
        api.on_parse_attributes("M", &attrs(Some("Stale"), Some("SE"), ParseStatus::Valid))
            .unwrap();
        api.on_parse_attributes("MI", &attrs(Some("Fresh"), Some("US"), ParseStatus::Valid))
            .unwrap();
        let release_first = api.hold_parse("M");

        let metrics = Arc::new(ConsoleMetrics::new().unwrap());
        let assistant = RequestAttributeAssistant::new(api.clone(), metrics.clone());

        // The first keystroke's response arrives after the second one's
        let first = assistant.on_input_change("M");
        let second = async {
            let outcome = assistant.on_input_change("MI").await;
            release_first.send(()).unwrap();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), ApplyOutcome::Superseded);
        assert_eq!(second.unwrap(), ApplyOutcome::Applied(ParseStatus::Valid));

        let form = assistant.form();
        assert_eq!(form.input_text, "MI");
        assert_eq!(form.fields.common_name, "Fresh");
        assert_eq!(form.fields.country, "US");
        assert_eq!(metrics.parse_requests(), 2);
        assert_eq!(metrics.stale_responses(), 1);
        assert_eq!(api.calls(), vec!["processCertReqData M", "processCertReqData MI"]);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_clobber_message() {
        let api = Arc::new(ScriptedConsoleApi::new());
        api.on_parse("a", ScriptedResponse::Fail);
        api.on_parse("", ScriptedResponse::Body(r#"{"errorMessage":"empty"}"#.to_string()));
        let release_first = api.hold_parse("a");
        let assistant = RequestAttributeAssistant::new(api.clone(), Arc::new(ConsoleMetrics::new().unwrap()));

        let first = assistant.on_input_change("a");
        let second = async {
            let outcome = assistant.on_input_change("").await;
            drop(release_first);
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), ApplyOutcome::Superseded);
        assert_eq!(second.unwrap(), ApplyOutcome::Applied(ParseStatus::Empty));
        let form = assistant.form();
        assert_eq!(form.message, "");
        assert!(!form.submit_enabled);
    }
}
