use async_trait::async_trait;
use std::sync::Arc;

use crate::ca::client::HttpConsoleApi;
use crate::config::Config;
use crate::types::{Instance, Result};

/// Endpoints of the CA server the console reads from
///
/// Every call returns the raw response body, `None` when the server answered
/// with an empty body. Failing transports surface as `Err`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Parse a pasted certificate request (`processCertReqData`)
    async fn process_cert_req_data(&self, input: &str) -> Result<Option<String>>;

    /// Fetch an issued certificate by serial number (`getCertData`)
    async fn get_cert_data(&self, serial_number: &str, instance: &Instance) -> Result<Option<String>>;

    /// Fetch a certificate of the CA chain by index (`getChainCertData`)
    async fn get_chain_cert_data(&self, idx: usize, instance: &Instance) -> Result<Option<String>>;
}

/// Create the HTTP backed console API from configuration
pub fn create_console_api(config: &Config) -> Result<Arc<dyn ConsoleApi>> {
    let api = HttpConsoleApi::new(config)?;
    Ok(Arc::new(api))
}
