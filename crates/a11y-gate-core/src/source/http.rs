//! Client for the remote accessibility-scanning service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{ScanError, ScanSettings, ScanSource, DEFAULT_ENDPOINT};

const SCAN_PATH: &str = "/v1/scan";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("a11y-gate/", env!("CARGO_PKG_VERSION"));
const MAX_DETAIL_CHARS: usize = 200;

/// Submits scan requests over HTTP.
///
/// One attempt per invocation: a CI gate should surface upstream trouble
/// immediately rather than retry into a timeout budget.
#[derive(Debug, Clone)]
pub struct HttpScanSource {
    http: Client,
    url: String,
    token: Option<String>,
}

impl HttpScanSource {
    /// Build a client from settings, applying the endpoint and timeout
    /// defaults where unset.
    pub fn new(settings: &ScanSettings) -> Result<Self, ScanError> {
        let base = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let url = format!("{}{SCAN_PATH}", base.trim_end_matches('/'));
        let timeout = settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout))
            .build()?;
        Ok(Self {
            http,
            url,
            token: settings.token.clone(),
        })
    }
}

#[async_trait]
impl ScanSource for HttpScanSource {
    #[instrument(name = "fetch_scan", skip(self), fields(url = %self.url))]
    async fn fetch(&self, target: &str) -> Result<Value, ScanError> {
        let mut request = self.http.post(&self.url).json(&json!({ "url": target }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Status {
                status,
                detail: excerpt(&body),
            });
        }

        debug!(%status, "scan service responded");
        response.json::<Value>().await.map_err(ScanError::Decode)
    }
}

/// Collapse a response body into one short line for error messages.
fn excerpt(body: &str) -> String {
    let flat: String = body
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let trimmed = flat.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    if trimmed.chars().count() <= MAX_DETAIL_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    cut.push('…');
    cut
}
