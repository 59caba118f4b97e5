use std::collections::HashMap;

/// Environment-driven configuration for the scan-service client.
///
/// Every field is optional; [`crate::source::HttpScanSource`] fills in the
/// defaults. Callers (the CLI) may overwrite fields after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSettings {
    /// Base URL of the scan service.
    pub endpoint: Option<String>,
    /// Bearer token sent with each request.
    pub token: Option<String>,
    /// Whole-second HTTP timeout.
    pub timeout_secs: Option<u64>,
}

impl ScanSettings {
    const ENDPOINT_ENV: &'static str = "A11Y_GATE_ENDPOINT";
    const TOKEN_ENV: &'static str = "A11Y_GATE_TOKEN";
    const TIMEOUT_ENV: &'static str = "A11Y_GATE_TIMEOUT_SECS";

    /// Load settings from `A11Y_GATE_ENDPOINT`, `A11Y_GATE_TOKEN`, and
    /// `A11Y_GATE_TIMEOUT_SECS`.
    ///
    /// Blank values count as unset; an unparsable timeout is ignored.
    pub fn from_env() -> Self {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Self {
        let endpoint = vars
            .get(Self::ENDPOINT_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let token = vars
            .get(Self::TOKEN_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let timeout_secs = vars
            .get(Self::TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            endpoint,
            token,
            timeout_secs,
        }
    }
}
