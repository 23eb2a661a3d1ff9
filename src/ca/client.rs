use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::ca::provider::ConsoleApi;
use crate::ca::types::{CertDataQuery, ChainCertDataQuery, ParseQuery};
use crate::config::Config;
use crate::error::Error;
use crate::types::{Instance, Result};

pub const PROCESS_CERT_REQ_DATA: &str = "processCertReqData";
pub const GET_CERT_DATA: &str = "getCertData";
pub const GET_CHAIN_CERT_DATA: &str = "getChainCertData";

/// Treat an empty or `null` response body as no data
pub(crate) fn non_empty_body(body: String) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        Some(body)
    }
}

/// Create the HTTP client shared by the API and the navigator
pub(crate) fn build_http_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.http_timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| Error::HttpClient(format!("Failed to create HTTP client: {}", e)))
}

/// Console API talking to the CA server over HTTP
#[derive(Debug, Clone)]
pub struct HttpConsoleApi {
    /// HTTP client
    client: Client,
    /// Base URL every endpoint is resolved against
    base_url: Url,
}

impl HttpConsoleApi {
    /// Create a new console API client
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.base_url()?,
        })
    }

    /// Issue a GET and hand back the body, `None` for an empty or `null` body
    async fn get_body<Q: Serialize + ?Sized>(&self, endpoint: &str, query: &Q) -> Result<Option<String>> {
        let url = self.base_url.join(endpoint)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::HttpClient(format!("Failed to send request to {}: {}", endpoint, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("{} returned status {}", endpoint, status);
            return Err(Error::Transport {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(non_empty_body(body))
    }
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn process_cert_req_data(&self, input: &str) -> Result<Option<String>> {
        let query = ParseQuery {
            cert_request_input_text: input,
        };
        self.get_body(PROCESS_CERT_REQ_DATA, &query).await
    }

    async fn get_cert_data(&self, serial_number: &str, instance: &Instance) -> Result<Option<String>> {
        let query = CertDataQuery {
            serial_number,
            instance: instance.as_str(),
        };
        self.get_body(GET_CERT_DATA, &query).await
    }

    async fn get_chain_cert_data(&self, idx: usize, instance: &Instance) -> Result<Option<String>> {
        let query = ChainCertDataQuery {
            idx,
            instance: instance.as_str(),
        };
        self.get_body(GET_CHAIN_CERT_DATA, &query).await
    }
}
