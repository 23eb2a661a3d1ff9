use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::ca::client::build_http_client;
use crate::config::Config;
use crate::error::Error;
use crate::interface::cookie::CookieStore;
use crate::types::{Instance, Result};

pub const REVOKE: &str = "revoke";
pub const ADMIN: &str = "admin";

/// Browser action produced by a confirmed dialog or a toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Full page load of a URL (GET)
    Navigate(Url),
    /// Submission of a page form (POST)
    SubmitForm(FormSubmission),
}

/// A form posted as `application/x-www-form-urlencoded`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Id of the submitted form element
    pub form_id: String,
    /// Form action URL
    pub action: Url,
    /// Submitted name/value pairs in document order
    pub fields: Vec<(String, String)>,
}

/// URLs of the console pages
#[derive(Debug, Clone)]
pub struct Routes {
    base_url: Url,
    request_form_action: String,
}

impl Routes {
    /// Routes resolved against an explicit base URL
    pub fn new(base_url: Url, request_form_action: impl Into<String>) -> Self {
        Self {
            base_url,
            request_form_action: request_form_action.into(),
        }
    }

    /// Routes of the configured server
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.base_url()?, config.server.request_form_action.clone()))
    }

    /// `revoke?instance=..&serialNumber=..&revokeKey=..`
    pub fn revoke(&self, instance: &Instance, serial_number: &str, revoke_key: &str) -> Result<Url> {
        let mut url = self.base_url.join(REVOKE)?;
        url.query_pairs_mut()
            .append_pair("instance", instance.as_str())
            .append_pair("serialNumber", serial_number)
            .append_pair("revokeKey", revoke_key);
        Ok(url)
    }

    /// `admin?instance=..`
    pub fn admin(&self, instance: &Instance) -> Result<Url> {
        let mut url = self.base_url.join(ADMIN)?;
        url.query_pairs_mut().append_pair("instance", instance.as_str());
        Ok(url)
    }

    /// Target of the certificate request form
    pub fn request_form(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.request_form_action)?)
    }
}

/// Page loads performed by the hosting browser
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Load a page, returning its body
    async fn navigate(&self, url: &Url) -> Result<String>;

    /// Post a form, returning the body of the resulting page
    async fn submit_form(&self, form: &FormSubmission) -> Result<String>;

    /// Carry out an action
    async fn perform(&self, action: &Action) -> Result<String> {
        match action {
            Action::Navigate(url) => self.navigate(url).await,
            Action::SubmitForm(form) => self.submit_form(form).await,
        }
    }
}

/// Navigator loading pages over HTTP with the console cookies attached
pub struct HttpNavigator {
    client: Client,
    cookies: Arc<dyn CookieStore>,
}

impl HttpNavigator {
    /// Create a navigator sharing the given cookie store
    pub fn new(config: &Config, cookies: Arc<dyn CookieStore>) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            cookies,
        })
    }

    async fn read_page(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<String> {
        let request = match self.cookies.header() {
            Some(header) => request.header(COOKIE, header),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::HttpClient(format!("Failed to load {}: {}", url.path(), e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Page {} returned status {}", url.path(), status);
            return Err(Error::Transport {
                endpoint: url.path().to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn navigate(&self, url: &Url) -> Result<String> {
        // The query may carry the revoke key, log the path only
        info!("Navigating to {}", url.path());
        self.read_page(self.client.get(url.clone()), url).await
    }

    async fn submit_form(&self, form: &FormSubmission) -> Result<String> {
        info!("Submitting form {} to {}", form.form_id, form.action.path());
        let request = self.client.post(form.action.clone()).form(&form.fields);
        self.read_page(request, &form.action).await
    }
}

/// Navigator that records actions instead of loading pages
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    performed: Mutex<Vec<Action>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions performed so far
    pub fn performed(&self) -> Vec<Action> {
        self.performed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, url: &Url) -> Result<String> {
        self.performed.lock().unwrap().push(Action::Navigate(url.clone()));
        Ok(String::new())
    }

    async fn submit_form(&self, form: &FormSubmission) -> Result<String> {
        self.performed.lock().unwrap().push(Action::SubmitForm(form.clone()));
        Ok(String::new())
    }
}
