use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::types::{Instance, Result};

/// Main configuration structure for the admin console
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// CA server the console talks to
    pub server: ServerConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Page layout settings
    pub ui: UiConfig,

    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Application name
    pub app_name: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: "CA Admin Console".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// CA server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL all console endpoints are resolved against
    pub base_url: String,

    /// CA instance the console operates on
    pub instance: String,

    /// Authorization token carried by revoke navigations
    pub revoke_key: String,

    /// Endpoint the certificate request form is posted to
    pub request_form_action: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            instance: "ca".to_string(),
            revoke_key: String::new(),
            request_form_action: "request".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds, transport default when unset
    pub timeout_seconds: Option<u64>,
}

/// Page layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Height of the hosting window in pixels
    pub window_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { window_height: 900 }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Enable structured (JSON) logging
    pub structured_logging: bool,

    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            structured_logging: false,
            enable_metrics: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            ui: UiConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, configuration files and environment variables
    pub fn load() -> Result<Self> {
        use config::{Config as ConfigBuilder, Environment, File};

        let mut builder = ConfigBuilder::builder();

        // Add default values
        builder = builder.add_source(ConfigBuilder::try_from(&Self::default())?);

        // Add configuration from files
        if let Ok(config_path) = env::var("CONSOLE_CONFIG") {
            debug!("Loading configuration from {}", config_path);
            builder = builder.add_source(File::with_name(&config_path));
        } else {
            builder = builder.add_source(File::with_name("config/default").required(false));

            let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
            builder = builder.add_source(File::with_name(&format!("config/{}", app_env)).required(false));
        }

        // CONSOLE_SERVER__BASE_URL style overrides
        builder = builder.add_source(
            Environment::with_prefix("CONSOLE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check if configuration is valid
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.is_empty() {
            return Err(Error::Config("Server base URL cannot be empty".into()));
        }

        let base = Url::parse(&self.server.base_url)
            .map_err(|e| Error::Config(format!("Invalid server base URL: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("Server URL {} cannot be a base", base)));
        }

        if self.server.instance.is_empty() {
            return Err(Error::Config("Instance cannot be empty".into()));
        }

        if self.server.request_form_action.is_empty() {
            return Err(Error::Config("Request form action cannot be empty".into()));
        }

        if self.http.timeout_seconds == Some(0) {
            return Err(Error::Config("HTTP timeout cannot be zero".into()));
        }

        Ok(())
    }

    /// Base URL with a trailing slash so relative endpoints resolve under it
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.server.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    /// Configured instance qualifier
    pub fn instance(&self) -> Instance {
        Instance::new(self.server.instance.clone())
    }

    /// Configured HTTP timeout
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }
}
