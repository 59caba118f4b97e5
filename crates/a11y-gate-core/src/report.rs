use serde::{Deserialize, Serialize};

/// Canonical severity levels used to bucket accessibility violations.
///
/// Declared most to least severe so ordering comparisons and report
/// breakdowns follow the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Severity {
    /// All severities in breakdown order.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    /// Classify a raw severity string from an untrusted payload.
    ///
    /// Only the four canonical names are accepted (case-insensitive).
    /// Anything else, including a missing value, counts as `Minor`: unknown
    /// severities are never dropped and never an error.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "serious" => Severity::Serious,
            "moderate" => Severity::Moderate,
            _ => Severity::Minor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported accessibility issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub title: String,
    /// How many times the issue occurs on the page. Always at least 1.
    pub instance_count: u64,
}

/// Per-severity issue totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: u64,
    pub serious: u64,
    pub moderate: u64,
    pub minor: u64,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Serious => self.serious,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
        }
    }

    pub fn add(&mut self, severity: Severity, count: u64) {
        let slot = match severity {
            Severity::Critical => &mut self.critical,
            Severity::Serious => &mut self.serious,
            Severity::Moderate => &mut self.moderate,
            Severity::Minor => &mut self.minor,
        };
        *slot = slot.saturating_add(count);
    }

    pub fn total(&self) -> u64 {
        self.critical
            .saturating_add(self.serious)
            .saturating_add(self.moderate)
            .saturating_add(self.minor)
    }
}

/// Canonical, default-filled summary derived from one raw scan payload,
/// independent of which API schema version produced it.
///
/// Constructed once per invocation by [`crate::normalize::normalize`] and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReport {
    /// Overall score in `[0, 100]`; 0 when the payload carries none.
    pub score: u8,
    /// Itemized violations in payload order; may be empty even when issues
    /// exist (summary-only responses).
    pub violations: Vec<Violation>,
    pub severity_counts: SeverityCounts,
    pub total_issues: u64,
    /// Up to 3 violations with the highest instance counts, descending;
    /// ties keep payload order.
    pub top_issues: Vec<Violation>,
    /// Absolute URL of the full report page. Always resolvable.
    pub report_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_accepts_canonical_names_case_insensitively() {
        assert_eq!(Severity::classify(Some("critical")), Severity::Critical);
        assert_eq!(Severity::classify(Some("Serious")), Severity::Serious);
        assert_eq!(Severity::classify(Some("MODERATE")), Severity::Moderate);
        assert_eq!(Severity::classify(Some("minor")), Severity::Minor);
    }

    #[test]
    fn classify_maps_unknown_and_missing_to_minor() {
        assert_eq!(Severity::classify(Some("UNKNOWN_LEVEL")), Severity::Minor);
        assert_eq!(Severity::classify(Some("")), Severity::Minor);
        assert_eq!(Severity::classify(None), Severity::Minor);
    }

    #[test]
    fn counts_track_additions_per_severity() {
        let mut counts = SeverityCounts::default();
        counts.add(Severity::Critical, 4);
        counts.add(Severity::Serious, 3);
        counts.add(Severity::Serious, 2);
        assert_eq!(counts.get(Severity::Critical), 4);
        assert_eq!(counts.get(Severity::Serious), 5);
        assert_eq!(counts.get(Severity::Moderate), 0);
        assert_eq!(counts.total(), 9);
    }

    #[test]
    fn counts_total_saturates_instead_of_overflowing() {
        let counts = SeverityCounts {
            critical: u64::MAX,
            serious: 1,
            moderate: 0,
            minor: 0,
        };
        assert_eq!(counts.total(), u64::MAX);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str("\"minor\"").unwrap();
        assert_eq!(back, Severity::Minor);
    }
}
