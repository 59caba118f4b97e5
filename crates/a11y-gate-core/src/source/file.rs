//! Scan payloads from disk, for offline rendering and tests.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{ScanError, ScanSource};

/// Reads a previously saved scan payload instead of calling the service.
///
/// The target URL is ignored here; it still feeds the rendered output.
#[derive(Debug, Clone)]
pub struct FileScanSource {
    path: PathBuf,
}

impl FileScanSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScanSource for FileScanSource {
    async fn fetch(&self, _target: &str) -> Result<Value, ScanError> {
        debug!(path = %self.path.display(), "reading saved scan payload");
        let raw = fs::read_to_string(&self.path).map_err(|source| ScanError::File {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ScanError::FileJson {
            path: self.path.clone(),
            source,
        })
    }
}
