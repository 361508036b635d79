//! Configuration loading and validation
//!
//! [`Config::load`] reads an optional TOML file and `PUREFA_EXPORTER__*`
//! environment overrides. The `[purefa]` section is then validated once with
//! [`PureFaConfig::init`], which fills defaults and produces the immutable
//! [`ArrayConfig`] the collector runs with.

use crate::error::{ExporterError, Result as ExporterResult};
use anyhow::{Context, Result};
use reqwest::header::HeaderValue;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// REST API version the collector speaks
pub const API_VERSION: &str = "1.15";

/// Request timeout used when `http_timeout_seconds` is zero or unset
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

/// Sample configuration file, printed by `--sample-config`
pub const SAMPLE_CONFIG: &str = r#"[purefa]
## FlashArray management address
array = "purefa1.example.com"
## Pure API token
api_token = "55b0bf09-10b4-e54c-7db8-9fccc742e908"
## Override the API base URL (default: https://<array>/api/1.15)
# base_url = "https://purefa1.example.com/api/1.15"
## HTTP timeout in seconds (0 = 4s default)
# http_timeout_seconds = 4
## Verify the array TLS certificate
# verify_ssl = true
## Filter Snapshots - filter out Veeam created volume copies
# ignore_veeamsnap = false

[server]
# addr = "0.0.0.0"
# port = 9491

[metrics]
# scrape_interval_seconds = 60
# collect_performance_metrics = true
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub purefa: PureFaConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PureFaConfig {
    #[serde(default)]
    pub array: String,
    #[serde(default)]
    pub api_token: Option<SecretString>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub http_timeout_seconds: u64,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub ignore_veeamsnap: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_scrape_interval")]
    pub scrape_interval_seconds: u64,
    #[serde(default = "default_true")]
    pub collect_performance_metrics: bool,
}

/// Validated array settings, immutable after [`PureFaConfig::init`]
#[derive(Debug, Clone)]
pub struct ArrayConfig {
    pub array: String,
    pub api_token: SecretString,
    pub base_url: Url,
    pub request_timeout: Duration,
    pub verify_ssl: bool,
    pub ignore_veeamsnap: bool,
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9491
}

fn default_verify_ssl() -> bool {
    true
}

fn default_scrape_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for PureFaConfig {
    fn default() -> Self {
        Self {
            array: String::new(),
            api_token: None,
            base_url: None,
            http_timeout_seconds: 0,
            verify_ssl: default_verify_ssl(),
            ignore_veeamsnap: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            scrape_interval_seconds: default_scrape_interval(),
            collect_performance_metrics: true,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("PUREFA_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Apply command-line overrides; `None` keeps the loaded value
    pub fn with_overrides(
        mut self,
        array: Option<String>,
        api_token: Option<String>,
        addr: Option<String>,
        port: Option<u16>,
    ) -> Self {
        if let Some(array) = array {
            self.purefa.array = array;
        }
        if let Some(token) = api_token {
            self.purefa.api_token = Some(SecretString::from(token));
        }
        if let Some(addr) = addr {
            self.server.addr = addr;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

impl PureFaConfig {
    /// Validate the array settings and fill defaults
    ///
    /// Fails with [`ExporterError::Config`] when the API token is empty, when
    /// neither `array` nor `base_url` is set, or when `base_url` is not an
    /// absolute http(s) URL. Performs no I/O.
    pub fn init(self) -> ExporterResult<ArrayConfig> {
        let token = self
            .api_token
            .as_ref()
            .map(|t| t.expose_secret().trim())
            .unwrap_or_default();
        if token.is_empty() {
            return Err(ExporterError::Config("You must specify an API Token".to_string()));
        }
        if HeaderValue::from_str(&format!("Token {}", token)).is_err() {
            return Err(ExporterError::Config(
                "API token contains characters not allowed in an HTTP header".to_string(),
            ));
        }
        let api_token = SecretString::from(token.to_string());

        let array = self.array.trim().to_string();
        let base_url = match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                if array.is_empty() {
                    return Err(ExporterError::Config(
                        "You must specify an array address or a base_url".to_string(),
                    ));
                }
                format!("https://{}/api/{}", array, API_VERSION)
            }
        };
        let base_url = Url::parse(&base_url)
            .map_err(|e| ExporterError::Config(format!("Invalid base_url {}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ExporterError::Config(format!(
                "base_url must be an http(s) URL, got {}",
                base_url
            )));
        }

        let request_timeout = if self.http_timeout_seconds == 0 {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            Duration::from_secs(self.http_timeout_seconds)
        };

        Ok(ArrayConfig {
            array,
            api_token,
            base_url,
            request_timeout,
            verify_ssl: self.verify_ssl,
            ignore_veeamsnap: self.ignore_veeamsnap,
        })
    }
}

impl ArrayConfig {
    /// Value of the `Authorization` header sent with every request
    pub(crate) fn authorization(&self) -> String {
        format!("Token {}", self.api_token.expose_secret())
    }
}
