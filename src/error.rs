use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Pure Array responded with unexpected status code {code}")]
    UnexpectedStatus { code: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Unable to decode Pure response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Volumes(VolumeFailures),

    #[error("HTTP server error: {0}")]
    Server(String),
}

/// Network-level failure talking to the array
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("no response headers received within {0:?}")]
    HeaderTimeout(Duration),
}

impl From<reqwest::Error> for ExporterError {
    fn from(err: reqwest::Error) -> Self {
        ExporterError::Transport(TransportError::Request(err))
    }
}

/// A per-volume extraction failure
#[derive(Debug, Error)]
#[error("volume {volume}: {source}")]
pub struct VolumeError {
    pub volume: String,
    #[source]
    pub source: ExporterError,
}

/// Every per-volume failure from a single gather
#[derive(Debug)]
pub struct VolumeFailures {
    /// Number of volumes processed in the gather
    pub total: usize,
    pub failures: Vec<VolumeError>,
}

impl VolumeFailures {
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn volumes(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.volume.as_str())
    }
}

impl fmt::Display for VolumeFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to collect metrics for {} of {} volumes",
            self.failures.len(),
            self.total
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, failure)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
