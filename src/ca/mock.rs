use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

use crate::ca::client::non_empty_body;
use crate::ca::provider::ConsoleApi;
use crate::ca::types::{CertDetailPayload, ParsedRequestAttributes};
use crate::error::Error;
use crate::types::{Instance, Result};

/// Canned answer of the scripted API
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Respond with this body, empty or `null` reads as no data like over HTTP
    Body(String),
    /// Respond with an empty body
    Empty,
    /// Fail at the transport level
    Fail,
}

impl ScriptedResponse {
    fn into_result(self, endpoint: &str) -> Result<Option<String>> {
        match self {
            ScriptedResponse::Body(body) => Ok(non_empty_body(body)),
            ScriptedResponse::Empty => Ok(None),
            ScriptedResponse::Fail => Err(Error::HttpClient(format!("{} unreachable", endpoint))),
        }
    }
}

/// In-memory console API answering from scripted responses
///
/// Unscripted requests get an empty body. Parse requests can be held back
/// until released, which lets callers force out-of-order completion.
#[derive(Default)]
pub struct ScriptedConsoleApi {
    /// Parse responses by input text
    parse: Mutex<HashMap<String, ScriptedResponse>>,
    /// Certificate responses by (serial number, instance)
    certs: Mutex<HashMap<(String, String), ScriptedResponse>>,
    /// Chain responses by (index, instance)
    chain: Mutex<HashMap<(usize, String), ScriptedResponse>>,
    /// Pending release signals for held parse requests
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    /// Log of requests in issue order
    calls: Mutex<Vec<String>>,
}

impl ScriptedConsoleApi {
    /// Create an API with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the parse result for an input
    pub fn on_parse(&self, input: &str, response: ScriptedResponse) {
        self.parse.lock().unwrap().insert(input.to_string(), response);
    }

    /// Script the parse result for an input from typed attributes
    pub fn on_parse_attributes(&self, input: &str, attrs: &ParsedRequestAttributes) -> Result<()> {
        let body = serde_json::to_string(attrs)?;
        self.on_parse(input, ScriptedResponse::Body(body));
        Ok(())
    }

    /// Script the certificate detail for a serial number
    pub fn on_cert(&self, serial_number: &str, instance: &Instance, response: ScriptedResponse) {
        self.certs
            .lock()
            .unwrap()
            .insert((serial_number.to_string(), instance.to_string()), response);
    }

    /// Script the chain certificate detail for an index
    pub fn on_chain_cert(&self, idx: usize, instance: &Instance, response: ScriptedResponse) {
        self.chain
            .lock()
            .unwrap()
            .insert((idx, instance.to_string()), response);
    }

    /// Body for a certificate detail payload
    pub fn detail_body(payload: &CertDetailPayload) -> Result<ScriptedResponse> {
        Ok(ScriptedResponse::Body(serde_json::to_string(payload)?))
    }

    /// Hold the parse request for `input` until the returned sender fires or drops
    pub fn hold_parse(&self, input: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(input.to_string(), rx);
        tx
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        debug!("Scripted API: {}", call);
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ConsoleApi for ScriptedConsoleApi {
    async fn process_cert_req_data(&self, input: &str) -> Result<Option<String>> {
        self.record(format!("processCertReqData {}", input));

        let gate = self.gates.lock().unwrap().remove(input);
        if let Some(gate) = gate {
            // A dropped sender releases the request as well
            let _ = gate.await;
        }

        let response = self
            .parse
            .lock()
            .unwrap()
            .get(input)
            .cloned()
            .unwrap_or(ScriptedResponse::Empty);
        response.into_result("processCertReqData")
    }

    async fn get_cert_data(&self, serial_number: &str, instance: &Instance) -> Result<Option<String>> {
        self.record(format!("getCertData {} {}", serial_number, instance));

        let response = self
            .certs
            .lock()
            .unwrap()
            .get(&(serial_number.to_string(), instance.to_string()))
            .cloned()
            .unwrap_or(ScriptedResponse::Empty);
        response.into_result("getCertData")
    }

    async fn get_chain_cert_data(&self, idx: usize, instance: &Instance) -> Result<Option<String>> {
        self.record(format!("getChainCertData {} {}", idx, instance));

        let response = self
            .chain
            .lock()
            .unwrap()
            .get(&(idx, instance.to_string()))
            .cloned()
            .unwrap_or(ScriptedResponse::Empty);
        response.into_result("getChainCertData")
    }
}
