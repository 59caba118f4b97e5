//! Where raw scan payloads come from: the remote scanning service, or a
//! previously saved response on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod file;
pub mod http;
mod settings;

pub use file::FileScanSource;
pub use http::HttpScanSource;
pub use settings::ScanSettings;

/// Default scan-service endpoint, overridable via settings.
pub const DEFAULT_ENDPOINT: &str = "https://api.a11ygate.dev";

/// Failures while obtaining a scan payload.
///
/// Messages carry no cause text; the underlying error travels on the
/// `source` chain.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to reach the scan service")]
    Transport(#[from] reqwest::Error),
    #[error("scan service returned {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },
    #[error("scan service returned a body that is not valid JSON")]
    Decode(#[source] reqwest::Error),
    #[error("failed to read saved payload {}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("saved payload {} is not valid JSON", .path.display())]
    FileJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A producer of raw scan payloads.
///
/// The payload is returned as loose JSON on purpose: normalization owns all
/// schema knowledge, so sources never interpret what they fetched.
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Produce the raw scan payload for `target`.
    async fn fetch(&self, target: &str) -> Result<Value, ScanError>;
}
