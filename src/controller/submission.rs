use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::controller::form::{RequestField, RequestFields};
use crate::interface::dialog::{AttributeRow, Dialog, DialogBody};
use crate::interface::dom;
use crate::interface::navigation::{Action, FormSubmission, Routes};
use crate::types::Result;

pub const CONFIRM_HEADING: &str = "Issue certificate to:";
pub const MISSING_ATTRIBUTES: &str = "Attributes \"Common name\" and \"Country\" must have values and \"Country\" must have 2 characters (ISO 3166 country code)";

/// Shape of an ISO 3166 alpha-2 code, the code list itself is not checked
static COUNTRY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// Rows of the confirmation table: labelled non-empty fields in form order
pub fn confirmation_rows(fields: &RequestFields) -> Vec<AttributeRow> {
    RequestField::ALL
        .iter()
        .filter(|field| !fields.get(**field).is_empty())
        .map(|field| AttributeRow {
            label: field.label().to_string(),
            value: fields.get(*field).to_string(),
        })
        .collect()
}

/// Whether the form may be submitted
pub fn is_submittable(fields: &RequestFields) -> bool {
    !fields.common_name.is_empty() && COUNTRY_CODE.is_match(&fields.country)
}

/// Gate in front of the certificate request form submission
pub struct SubmissionConfirmation {
    routes: Routes,
}

impl SubmissionConfirmation {
    pub fn new(routes: Routes) -> Self {
        Self { routes }
    }

    /// Confirmation dialog posting the form, or a blocking alert when invalid
    pub fn prepare_and_confirm_submission(&self, fields: &RequestFields) -> Result<Dialog> {
        if !is_submittable(fields) {
            debug!("Request form incomplete, showing alert");
            return Ok(Dialog::alert(DialogBody::Message {
                html: MISSING_ATTRIBUTES.to_string(),
                css_class: Some("cert-req-confirm-div".to_string()),
            }));
        }

        let rows = confirmation_rows(fields);
        info!("Asking to confirm issuance to {}", fields.common_name);

        let submission = FormSubmission {
            form_id: dom::REQUEST_FORM.to_string(),
            action: self.routes.request_form()?,
            fields: fields.form_pairs(),
        };
        let body = DialogBody::Attributes {
            heading: CONFIRM_HEADING.to_string(),
            rows,
        };
        Ok(Dialog::confirm(body, Action::SubmitForm(submission)))
    }
}
