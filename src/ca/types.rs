use serde::{Deserialize, Serialize};

/// `errorMessage` value the parser uses for "nothing has been typed yet"
pub const EMPTY_INPUT_SENTINEL: &str = "empty";

/// Certificate representation returned by `getCertData` and `getChainCertData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertDetailPayload {
    /// Server rendered certificate details
    #[serde(rename = "certHtml")]
    pub cert_html: String,
    /// PEM encoding of the certificate
    pub pem: String,
}

/// Outcome of parsing a certificate request blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseStatus {
    /// The request parsed and can be submitted
    Valid,
    /// The input is empty, nothing to report yet
    Empty,
    /// The parser rejected the input
    Invalid(String),
}

impl ParseStatus {
    /// Map the wire `errorMessage` field onto a status
    pub fn from_error_message(error_message: Option<String>) -> Self {
        match error_message {
            None => ParseStatus::Valid,
            Some(msg) if msg == EMPTY_INPUT_SENTINEL => ParseStatus::Empty,
            Some(msg) => ParseStatus::Invalid(msg),
        }
    }

    /// Wire `errorMessage` value for this status
    pub fn to_error_message(&self) -> Option<String> {
        match self {
            ParseStatus::Valid => None,
            ParseStatus::Empty => Some(EMPTY_INPUT_SENTINEL.to_string()),
            ParseStatus::Invalid(msg) => Some(msg.clone()),
        }
    }

    /// Whether the parsed request may be submitted
    pub fn allows_submission(&self) -> bool {
        matches!(self, ParseStatus::Valid)
    }
}

/// Subject attributes extracted from a certificate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireParseResult", into = "WireParseResult")]
pub struct ParsedRequestAttributes {
    /// Common name
    pub cn: Option<String>,
    /// Organization name
    pub o: Option<String>,
    /// Organizational unit name
    pub ou: Option<String>,
    /// Country code
    pub c: Option<String>,
    /// Organization identifier
    pub org_id: Option<String>,
    /// Parser verdict
    pub status: ParseStatus,
}

impl ParsedRequestAttributes {
    /// Response for an empty input field
    pub fn empty() -> Self {
        Self {
            cn: None,
            o: None,
            ou: None,
            c: None,
            org_id: None,
            status: ParseStatus::Empty,
        }
    }
}

/// JSON shape produced by `processCertReqData`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireParseResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    o: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    c: Option<String>,
    #[serde(rename = "orgId", default, skip_serializing_if = "Option::is_none")]
    org_id: Option<String>,
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl From<WireParseResult> for ParsedRequestAttributes {
    fn from(wire: WireParseResult) -> Self {
        Self {
            cn: wire.cn,
            o: wire.o,
            ou: wire.ou,
            c: wire.c,
            org_id: wire.org_id,
            status: ParseStatus::from_error_message(wire.error_message),
        }
    }
}

impl From<ParsedRequestAttributes> for WireParseResult {
    fn from(attrs: ParsedRequestAttributes) -> Self {
        Self {
            error_message: attrs.status.to_error_message(),
            cn: attrs.cn,
            o: attrs.o,
            ou: attrs.ou,
            c: attrs.c,
            org_id: attrs.org_id,
        }
    }
}

/// Query of `processCertReqData`
#[derive(Debug, Serialize)]
pub(crate) struct ParseQuery<'a> {
    #[serde(rename = "certRequestInputText")]
    pub cert_request_input_text: &'a str,
}

/// Query of `getCertData`
#[derive(Debug, Serialize)]
pub(crate) struct CertDataQuery<'a> {
    #[serde(rename = "serialNumber")]
    pub serial_number: &'a str,
    pub instance: &'a str,
}

/// Query of `getChainCertData`
#[derive(Debug, Serialize)]
pub(crate) struct ChainCertDataQuery<'a> {
    pub idx: usize,
    pub instance: &'a str,
}
