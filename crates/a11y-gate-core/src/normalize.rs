//! Turns whatever the scan service returned into a [`NormalizedReport`].
//!
//! The service has shipped several response schemas over time and the
//! payload is treated as untrusted: every field is probed through the
//! ordered candidate lists below and anything malformed falls back to a
//! neutral default. Normalization itself never fails.

use serde_json::Value;
use tracing::debug;

use crate::coerce::{count_u64, finite_f64, first_match, trimmed_str};
use crate::report::{NormalizedReport, Severity, SeverityCounts, Violation};

/// Base URL of the human-facing report dashboard.
pub const REPORT_BASE_URL: &str = "https://dashboard.a11ygate.dev";

/// Top-level fields probed for the itemized violation list, in priority
/// order. Only the first one that is actually an array is used.
const VIOLATION_LIST_FIELDS: &[&str] = &["violations", "issues", "results"];
/// Alternate names for a violation's severity.
const SEVERITY_FIELDS: &[&str] = &["impact", "severity", "level"];
/// Alternate names for a violation's human-readable title.
const TITLE_FIELDS: &[&str] = &["title", "help", "description", "id"];
/// Alternate names for an explicit link to the full report.
const REPORT_URL_FIELDS: &[&str] = &["reportUrl", "resultsUrl", "permalink"];

const FALLBACK_TITLE: &str = "Untitled issue";
const TOP_ISSUE_LIMIT: usize = 3;

/// Derive the canonical report for `requested_url` from a raw scan payload.
///
/// Total over arbitrary JSON: a payload of the wrong shape produces a
/// zero-score, zero-issue report rather than an error.
pub fn normalize(payload: &Value, requested_url: &str) -> NormalizedReport {
    let score = resolve_score(payload);
    let violations = resolve_violations(payload);
    let severity_counts = resolve_severity_counts(&violations, payload);
    let total_issues = resolve_total_issues(&violations, &severity_counts, payload);
    let top_issues = select_top_issues(&violations);
    let report_url = resolve_report_url(payload, requested_url);
    debug!(
        score,
        total_issues,
        itemized = violations.len(),
        "normalized scan payload"
    );
    NormalizedReport {
        score,
        violations,
        severity_counts,
        total_issues,
        top_issues,
        report_url,
    }
}

/// Clamp an arbitrary score into the canonical `0..=100` integer range.
/// NaN collapses to 0.
pub fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}

fn resolve_score(payload: &Value) -> u8 {
    // Ordered extractors: current top-level score, the nested result object
    // of the v2 schema, then the legacy percentage field.
    let candidates: [fn(&Value) -> Option<f64>; 3] = [
        |p| p.get("score").and_then(finite_f64),
        |p| p.get("result").and_then(|r| r.get("score")).and_then(finite_f64),
        |p| p.get("percentage").and_then(finite_f64),
    ];
    candidates
        .iter()
        .find_map(|extract| extract(payload))
        .map(clamp_score)
        .unwrap_or(0)
}

fn resolve_violations(payload: &Value) -> Vec<Violation> {
    let Some(items) = VIOLATION_LIST_FIELDS
        .iter()
        .filter_map(|field| payload.get(*field))
        .find_map(Value::as_array)
    else {
        return Vec::new();
    };
    items.iter().map(violation_from_value).collect()
}

fn violation_from_value(value: &Value) -> Violation {
    let severity = Severity::classify(first_match(value, SEVERITY_FIELDS, trimmed_str));
    let title = first_match(value, TITLE_FIELDS, trimmed_str)
        .unwrap_or(FALLBACK_TITLE)
        .to_string();
    Violation {
        severity,
        title,
        instance_count: resolve_instance_count(value),
    }
}

/// Explicit count wins over the node list length; both floor at 1 so a
/// listed violation always represents at least one occurrence.
fn resolve_instance_count(value: &Value) -> u64 {
    if let Some(count) = value.get("count").and_then(finite_f64) {
        return (count.round() as i64).max(1) as u64;
    }
    if let Some(nodes) = value.get("nodes").and_then(Value::as_array) {
        return (nodes.len() as u64).max(1);
    }
    1
}

/// Counts come from exactly one source: derived from the itemized list when
/// it is non-empty, otherwise read from the aggregate `counts` object of
/// summary-only responses. The two are never merged.
fn resolve_severity_counts(violations: &[Violation], payload: &Value) -> SeverityCounts {
    if !violations.is_empty() {
        let mut counts = SeverityCounts::default();
        for violation in violations {
            counts.add(violation.severity, violation.instance_count);
        }
        return counts;
    }
    match payload.get("counts") {
        Some(Value::Object(map)) => SeverityCounts {
            critical: map.get("critical").and_then(count_u64).unwrap_or(0),
            serious: map.get("serious").and_then(count_u64).unwrap_or(0),
            moderate: map.get("moderate").and_then(count_u64).unwrap_or(0),
            minor: map.get("minor").and_then(count_u64).unwrap_or(0),
        },
        _ => SeverityCounts::default(),
    }
}

fn resolve_total_issues(violations: &[Violation], counts: &SeverityCounts, payload: &Value) -> u64 {
    // Summary-only responses carry an authoritative total that may exceed
    // what the counts object accounts for; honor it verbatim.
    if violations.is_empty() {
        if let Some(total) = payload.get("issueCount").and_then(count_u64) {
            return total;
        }
    }
    counts.total()
}

fn select_top_issues(violations: &[Violation]) -> Vec<Violation> {
    let mut ranked = violations.to_vec();
    // Vec::sort_by is stable, so equal counts keep their payload order.
    ranked.sort_by(|a, b| b.instance_count.cmp(&a.instance_count));
    ranked.truncate(TOP_ISSUE_LIMIT);
    ranked
}

fn resolve_report_url(payload: &Value, requested_url: &str) -> String {
    if let Some(id) = payload.get("scanId").and_then(scan_id) {
        return format!("{REPORT_BASE_URL}/scan/{id}");
    }
    if let Some(url) = first_match(payload, REPORT_URL_FIELDS, explicit_report_url) {
        return url;
    }
    format!(
        "{REPORT_BASE_URL}/scans?url={}",
        urlencoding::encode(requested_url)
    )
}

/// Scan identifiers arrive as strings in current schemas and as integers in
/// the oldest one.
fn scan_id(value: &Value) -> Option<String> {
    if let Some(id) = trimmed_str(value) {
        return Some(id.to_string());
    }
    value.as_i64().map(|id| id.to_string())
}

/// Accept an explicit link only when it is absolute or root-relative;
/// anything else (a bare fragment, a scheme-relative path) is skipped and
/// the scan moves on to the next candidate.
fn explicit_report_url(value: &Value) -> Option<String> {
    let link = trimmed_str(value)?;
    if link.starts_with("http://") || link.starts_with("https://") {
        return Some(link.to_string());
    }
    if link.starts_with('/') && !link.starts_with("//") {
        return Some(format!("{REPORT_BASE_URL}{link}"));
    }
    None
}
