//! Element ids of the console page markup
//!
//! Form submissions and request fields are addressed by these ids so they
//! line up with the existing templates.

/// Certificate request form
pub const REQUEST_FORM: &str = "cert-req-form";
pub const COMMON_NAME_INPUT: &str = "commonNameInput";
pub const ORGANIZATION_NAME_INPUT: &str = "organizationNameInput";
pub const ORG_UNIT_NAME_INPUT: &str = "orgUnitNameInput";
pub const ORG_IDENTIFIER_INPUT: &str = "orgIdentifierInput";
pub const COUNTRY_INPUT: &str = "countryInput";
