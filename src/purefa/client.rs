//! FlashArray REST API Client
//!
//! Thin wrapper over a `reqwest::Client` for the two calls the collector
//! makes against the array's REST 1.x API.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS, one `reqwest::Client` built at startup and reused
//!   for every poll
//! - **Authentication**: `Authorization: Token <api_token>` on every request
//! - **Timeouts**: response headers must arrive within
//!   [`RESPONSE_HEADER_TIMEOUT`]; the whole request is bounded by the
//!   configured request timeout
//!
//! # Example
//!
//! ```no_run
//! use purefa_exporter::config::PureFaConfig;
//! use purefa_exporter::purefa::PureFaClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PureFaConfig {
//!     array: "purefa1.example.com".to_string(),
//!     api_token: Some(SecretString::from("your-api-token")),
//!     base_url: None,
//!     http_timeout_seconds: 0,
//!     verify_ssl: true,
//!     ignore_veeamsnap: false,
//! }
//! .init()?;
//!
//! let client = PureFaClient::new(config)?;
//! let volumes = client.list_volumes().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ArrayConfig;
use crate::error::{ExporterError, Result, TransportError};
use crate::purefa::types::{decode_performance, decode_volumes, Volume, VolumePerformance};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Maximum wait for the array to start answering a request
pub const RESPONSE_HEADER_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for the FlashArray REST API
///
/// Holds no mutable state after construction, so a shared reference can be
/// used from any task.
#[derive(Debug)]
pub struct PureFaClient {
    config: ArrayConfig,
    http: reqwest::Client,
    authorization: HeaderValue,
}

impl PureFaClient {
    pub fn new(config: ArrayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ExporterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mut authorization = HeaderValue::from_str(&config.authorization())
            .map_err(|e| ExporterError::Config(format!("Invalid API token: {}", e)))?;
        authorization.set_sensitive(true);

        Ok(Self {
            config,
            http,
            authorization,
        })
    }

    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// List all volumes on the array
    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        let url = self.endpoint(&["volume"]);
        let body = self.get(url).await?;
        decode_volumes(&body)
    }

    /// Fetch the current monitor sample for one volume
    pub async fn volume_performance(&self, name: &str) -> Result<VolumePerformance> {
        let mut url = self.endpoint(&["volume", name]);
        url.query_pairs_mut().append_pair("action", "monitor");
        let body = self.get(url).await?;
        decode_performance(&body)
    }

    /// Build `{base_url}/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue an authenticated GET and return the body of a 200 response
    ///
    /// The response is owned by this function, so its body is released on
    /// every return path.
    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let request = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .send();

        let response = tokio::time::timeout(RESPONSE_HEADER_TIMEOUT, request)
            .await
            .map_err(|_| TransportError::HeaderTimeout(RESPONSE_HEADER_TIMEOUT))??;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                debug!("{} returned {} bytes", url.path(), body.len());
                Ok(body.to_vec())
            }
            StatusCode::FORBIDDEN => Err(ExporterError::Auth(format!(
                "Pure Array responded with {} [Forbidden], verify your api_token",
                StatusCode::FORBIDDEN.as_u16()
            ))),
            status => Err(ExporterError::UnexpectedStatus {
                code: status.as_u16(),
            }),
        }
    }
}
