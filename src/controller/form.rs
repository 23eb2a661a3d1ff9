use std::fmt;
use serde::{Deserialize, Serialize};

use crate::ca::types::ParsedRequestAttributes;
use crate::interface::dom;
use crate::types::Visibility;

/// One of the subject attribute inputs of the request form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestField {
    CommonName,
    OrganizationName,
    OrgUnitName,
    OrgIdentifier,
    Country,
}

impl RequestField {
    /// All fields in form order
    pub const ALL: [RequestField; 5] = [
        RequestField::CommonName,
        RequestField::OrganizationName,
        RequestField::OrgUnitName,
        RequestField::OrgIdentifier,
        RequestField::Country,
    ];

    /// Id of the input element
    pub fn element_id(self) -> &'static str {
        match self {
            RequestField::CommonName => dom::COMMON_NAME_INPUT,
            RequestField::OrganizationName => dom::ORGANIZATION_NAME_INPUT,
            RequestField::OrgUnitName => dom::ORG_UNIT_NAME_INPUT,
            RequestField::OrgIdentifier => dom::ORG_IDENTIFIER_INPUT,
            RequestField::Country => dom::COUNTRY_INPUT,
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            RequestField::CommonName => "Common name",
            RequestField::OrganizationName => "Organization name",
            RequestField::OrgUnitName => "Organizational unit name",
            RequestField::OrgIdentifier => "Organization identifier",
            RequestField::Country => "Country",
        }
    }

    /// Parameter name used when the form is posted
    pub fn form_name(self) -> &'static str {
        match self {
            RequestField::CommonName => "cn",
            RequestField::OrganizationName => "o",
            RequestField::OrgUnitName => "ou",
            RequestField::OrgIdentifier => "orgId",
            RequestField::Country => "c",
        }
    }

    /// Value of this field in a parse result
    pub fn parsed_value(self, attrs: &ParsedRequestAttributes) -> Option<&str> {
        match self {
            RequestField::CommonName => attrs.cn.as_deref(),
            RequestField::OrganizationName => attrs.o.as_deref(),
            RequestField::OrgUnitName => attrs.ou.as_deref(),
            RequestField::OrgIdentifier => attrs.org_id.as_deref(),
            RequestField::Country => attrs.c.as_deref(),
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Values of the five attribute inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFields {
    pub common_name: String,
    pub organization_name: String,
    pub org_unit_name: String,
    pub org_identifier: String,
    pub country: String,
}

impl RequestFields {
    pub fn get(&self, field: RequestField) -> &str {
        match field {
            RequestField::CommonName => &self.common_name,
            RequestField::OrganizationName => &self.organization_name,
            RequestField::OrgUnitName => &self.org_unit_name,
            RequestField::OrgIdentifier => &self.org_identifier,
            RequestField::Country => &self.country,
        }
    }

    pub fn set(&mut self, field: RequestField, value: impl Into<String>) {
        let slot = match field {
            RequestField::CommonName => &mut self.common_name,
            RequestField::OrganizationName => &mut self.organization_name,
            RequestField::OrgUnitName => &mut self.org_unit_name,
            RequestField::OrgIdentifier => &mut self.org_identifier,
            RequestField::Country => &mut self.country,
        };
        *slot = value.into();
    }

    /// Overwrite every field from a parse result, clearing absent values
    pub fn fill_from(&mut self, attrs: &ParsedRequestAttributes) {
        for field in RequestField::ALL {
            let value = field.parsed_value(attrs).unwrap_or_default().to_string();
            self.set(field, value);
        }
    }

    /// Name/value pairs posted with the form
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        RequestField::ALL
            .iter()
            .map(|field| (field.form_name().to_string(), self.get(*field).to_string()))
            .collect()
    }
}

/// State of the certificate request page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFormView {
    /// Current content of the raw request text area
    pub input_text: String,
    /// Inline parse result message
    pub message: String,
    pub message_visibility: Visibility,
    /// Whether the "send request" button is enabled
    pub submit_enabled: bool,
    pub fields: RequestFields,
}

impl RequestFormView {
    /// Page as first rendered: message hidden, submission disabled
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn show_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.message_visibility = Visibility::Shown;
    }

    pub(crate) fn clear_message(&mut self) {
        self.message.clear();
        self.message_visibility = Visibility::Hidden;
    }
}
