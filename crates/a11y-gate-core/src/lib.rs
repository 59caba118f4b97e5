pub mod coerce;
pub mod normalize;
pub mod render;
pub mod report;
pub mod source;

pub use normalize::{clamp_score, normalize, REPORT_BASE_URL};
pub use render::{render, OutputMode, RenderedOutput};
pub use report::{NormalizedReport, Severity, SeverityCounts, Violation};
pub use source::{
    FileScanSource, HttpScanSource, ScanError, ScanSettings, ScanSource, DEFAULT_ENDPOINT,
};
