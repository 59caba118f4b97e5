//! Renders a [`NormalizedReport`] for terminals, CI logs, and pipelines.

use colored::{Color, ColoredString, Colorize};
use serde_json::Value;

use crate::coerce::finite_f64;
use crate::report::{NormalizedReport, Severity};

/// Output styles supported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-facing sectioned report with color and a score bar.
    Pretty,
    /// One stable machine-greppable status line.
    Ci,
    /// The raw payload pretty-printed as JSON, nothing else.
    Raw,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(OutputMode::Pretty),
            "ci" => Ok(OutputMode::Ci),
            "raw" => Ok(OutputMode::Raw),
            other => Err(format!(
                "unknown output mode `{other}` (expected pretty, ci, or raw)"
            )),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputMode::Pretty => "pretty",
            OutputMode::Ci => "ci",
            OutputMode::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// Rendered text plus the verdict against the threshold. The text never
/// carries a trailing newline; callers add their own.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub text: String,
    pub passed: bool,
}

const SCORE_BAR_WIDTH: usize = 24;
const BORDER_WIDTH: usize = 50;

/// Qualitative labels and colors keyed by minimum score.
const SCORE_LABELS: &[(u8, &str)] = &[
    (90, "Excellent"),
    (70, "Good"),
    (50, "Needs Improvement"),
    (0, "Poor"),
];
const SCORE_COLORS: &[(u8, Color)] = &[(90, Color::Green), (50, Color::Yellow), (0, Color::Red)];

/// Render `report` in the requested mode and gate it against `threshold`.
///
/// A score equal to the threshold passes; only scores strictly below it
/// fail. The verdict is computed for every mode, including raw.
pub fn render(
    report: &NormalizedReport,
    raw_payload: &Value,
    mode: OutputMode,
    requested_url: &str,
    threshold: f64,
) -> RenderedOutput {
    let passed = f64::from(report.score) >= threshold;
    let text = match mode {
        OutputMode::Pretty => render_pretty(report, raw_payload, requested_url),
        OutputMode::Ci => render_ci(report.score, threshold, passed),
        OutputMode::Raw => render_raw(raw_payload),
    };
    RenderedOutput { text, passed }
}

fn render_ci(score: u8, threshold: f64, passed: bool) -> String {
    let verdict = if passed { "PASS" } else { "FAIL" };
    format!("{verdict} score={score} threshold={threshold}")
}

fn render_raw(raw_payload: &Value) -> String {
    serde_json::to_string_pretty(raw_payload)
        .unwrap_or_else(|err| format!("{{\"error\": \"failed to serialize payload: {err}\"}}"))
}

fn render_pretty(report: &NormalizedReport, raw_payload: &Value, requested_url: &str) -> String {
    let border = "━".repeat(BORDER_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("Scanning: {requested_url}\n\n"));
    out.push_str(&format!("{border}\n"));
    out.push_str("  Accessibility Report\n");
    out.push_str(&format!("{border}\n\n"));

    let summary = format!(
        "{score}/100  {bar}  {label}",
        score = report.score,
        bar = score_bar(report.score),
        label = score_label(report.score),
    );
    out.push_str(&format!("Score: {}\n\n", summary.color(score_color(report.score))));

    out.push_str(&format!("Issues found: {}\n", report.total_issues));
    // The per-severity tree only makes sense when the numbers were derived
    // from itemized violations; summary-only responses skip it.
    if !report.violations.is_empty() {
        for (idx, severity) in Severity::ALL.iter().enumerate() {
            let branch = if idx + 1 == Severity::ALL.len() {
                "└─"
            } else {
                "├─"
            };
            out.push_str(&format!(
                "  {branch} {name}: {count}\n",
                name = severity_tag(*severity),
                count = report.severity_counts.get(*severity),
            ));
        }
    }
    out.push('\n');

    if report.top_issues.is_empty() {
        out.push_str("No itemized issues were returned; see the full report for details.\n");
    } else {
        out.push_str("Top issues:\n");
        for (idx, issue) in report.top_issues.iter().enumerate() {
            out.push_str(&format!(
                "  {n}. [{tag}] {title} ({count})\n",
                n = idx + 1,
                tag = severity_tag(issue.severity),
                title = issue.title,
                count = pluralize(issue.instance_count, "instance"),
            ));
        }
    }

    if let Some(more) = more_issue_count(raw_payload) {
        out.push_str(&format!(
            "\nNote: {} not shown here; see the full report for details.\n",
            pluralize(more, "more issue"),
        ));
    }

    out.push_str(&format!("\nFull report: {}\n{border}", report.report_url));
    out
}

fn score_bar(score: u8) -> String {
    let filled = (f64::from(score) / 100.0 * SCORE_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(SCORE_BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(SCORE_BAR_WIDTH - filled))
}

fn score_label(score: u8) -> &'static str {
    SCORE_LABELS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, label)| *label)
        .unwrap_or("Poor")
}

fn score_color(score: u8) -> Color {
    SCORE_COLORS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, color)| *color)
        .unwrap_or(Color::Red)
}

fn severity_tag(severity: Severity) -> ColoredString {
    let name = severity.as_str();
    match severity {
        Severity::Critical => name.red().bold(),
        Severity::Serious => name.yellow().bold(),
        Severity::Moderate => name.cyan(),
        Severity::Minor => name.white(),
    }
}

/// Summary payloads can flag findings that were not itemized in the
/// response at all; the notice is presentation-only and never feeds totals.
fn more_issue_count(raw_payload: &Value) -> Option<u64> {
    raw_payload
        .get("moreIssues")
        .and_then(finite_f64)
        .filter(|n| *n > 0.0)
        .map(|n| n.round() as u64)
}

fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use colored::control;
    use serde_json::json;

    const TARGET: &str = "https://example.com";

    fn itemized_report() -> (NormalizedReport, Value) {
        let payload = json!({
            "score": 85,
            "scanId": "abc",
            "violations": [
                {"impact": "critical", "title": "Images must have alternate text", "nodes": [1, 2, 3, 4]},
                {"impact": "serious", "title": "Buttons need accessible names", "count": 3}
            ]
        });
        (normalize(&payload, TARGET), payload)
    }

    #[test]
    fn ci_line_reports_failure_below_threshold() {
        let report = normalize(&json!({"score": 65}), TARGET);
        let rendered = render(&report, &json!({"score": 65}), OutputMode::Ci, TARGET, 70.0);
        assert!(!rendered.passed);
        insta::assert_snapshot!(rendered.text, @"FAIL score=65 threshold=70");
    }

    #[test]
    fn ci_line_reports_success_at_or_above_threshold() {
        let report = normalize(&json!({"score": 80}), TARGET);
        let rendered = render(&report, &json!({"score": 80}), OutputMode::Ci, TARGET, 80.0);
        assert!(rendered.passed);
        insta::assert_snapshot!(rendered.text, @"PASS score=80 threshold=80");
    }

    #[test]
    fn ci_line_keeps_fractional_thresholds() {
        let report = normalize(&json!({"score": 80}), TARGET);
        let rendered = render(&report, &json!({"score": 80}), OutputMode::Ci, TARGET, 80.5);
        insta::assert_snapshot!(rendered.text, @"FAIL score=80 threshold=80.5");
    }

    #[test]
    fn raw_mode_echoes_the_payload_verbatim() {
        let payload = json!({"score": 85, "extra": {"nested": true}});
        let report = normalize(&payload, TARGET);
        let rendered = render(&report, &payload, OutputMode::Raw, TARGET, 80.0);
        assert_eq!(rendered.text, serde_json::to_string_pretty(&payload).unwrap());
        assert!(rendered.passed);
    }

    #[test]
    fn pretty_output_lays_out_every_section() {
        control::set_override(false);
        let (report, payload) = itemized_report();
        let rendered = render(&report, &payload, OutputMode::Pretty, TARGET, 80.0);
        let border = "━".repeat(50);
        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(lines[0], "Scanning: https://example.com");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], border);
        assert_eq!(lines[3], "  Accessibility Report");
        assert_eq!(lines[4], border);
        assert_eq!(lines[5], "");
        assert_eq!(
            lines[6],
            format!("Score: 85/100  {}  Good", "█".repeat(20) + &"░".repeat(4))
        );
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "Issues found: 7");
        assert_eq!(lines[9], "  ├─ critical: 4");
        assert_eq!(lines[10], "  ├─ serious: 3");
        assert_eq!(lines[11], "  ├─ moderate: 0");
        assert_eq!(lines[12], "  └─ minor: 0");
        assert_eq!(lines[13], "");
        assert_eq!(lines[14], "Top issues:");
        assert_eq!(
            lines[15],
            "  1. [critical] Images must have alternate text (4 instances)"
        );
        assert_eq!(
            lines[16],
            "  2. [serious] Buttons need accessible names (3 instances)"
        );
        assert_eq!(lines[17], "");
        assert_eq!(lines[18], "Full report: https://dashboard.a11ygate.dev/scan/abc");
        assert_eq!(lines[19], border);
        assert_eq!(lines.len(), 20);
        assert!(!rendered.text.ends_with('\n'));
    }

    #[test]
    fn summary_only_reports_skip_the_breakdown_tree() {
        control::set_override(false);
        let payload = json!({"scanId": "abc123", "score": 42.6, "issueCount": 12});
        let report = normalize(&payload, TARGET);
        let rendered = render(&report, &payload, OutputMode::Pretty, TARGET, 80.0);
        assert!(rendered.text.contains("Issues found: 12"));
        assert!(!rendered.text.contains("├─"));
        assert!(!rendered.text.contains("└─"));
        assert!(rendered
            .text
            .contains("No itemized issues were returned; see the full report for details."));
        assert!(rendered
            .text
            .contains("Full report: https://dashboard.a11ygate.dev/scan/abc123"));
    }

    #[test]
    fn more_issues_notice_appears_only_when_flagged() {
        control::set_override(false);
        let flagged = json!({"score": 70, "violations": [{"id": "contrast"}], "moreIssues": 5});
        let report = normalize(&flagged, TARGET);
        let rendered = render(&report, &flagged, OutputMode::Pretty, TARGET, 80.0);
        assert!(rendered
            .text
            .contains("Note: 5 more issues not shown here; see the full report for details."));

        let unflagged = json!({"score": 70, "violations": [{"id": "contrast"}]});
        let report = normalize(&unflagged, TARGET);
        let rendered = render(&report, &unflagged, OutputMode::Pretty, TARGET, 80.0);
        assert!(!rendered.text.contains("Note:"));
    }

    #[test]
    fn more_issues_notice_uses_singular_for_one() {
        control::set_override(false);
        let payload = json!({"violations": [{"id": "contrast"}], "moreIssues": 1});
        let report = normalize(&payload, TARGET);
        let rendered = render(&report, &payload, OutputMode::Pretty, TARGET, 0.0);
        assert!(rendered.text.contains("Note: 1 more issue not shown here"));
    }

    #[test]
    fn single_instance_issues_read_singular() {
        control::set_override(false);
        let payload = json!({"violations": [{"id": "html-lang", "count": 1}]});
        let report = normalize(&payload, TARGET);
        let rendered = render(&report, &payload, OutputMode::Pretty, TARGET, 0.0);
        assert!(rendered.text.contains("  1. [minor] html-lang (1 instance)"));
    }

    #[test]
    fn score_labels_follow_the_documented_bands() {
        assert_eq!(score_label(100), "Excellent");
        assert_eq!(score_label(90), "Excellent");
        assert_eq!(score_label(89), "Good");
        assert_eq!(score_label(70), "Good");
        assert_eq!(score_label(69), "Needs Improvement");
        assert_eq!(score_label(50), "Needs Improvement");
        assert_eq!(score_label(49), "Poor");
        assert_eq!(score_label(0), "Poor");
    }

    #[test]
    fn score_colors_follow_the_documented_bands() {
        assert_eq!(score_color(95), Color::Green);
        assert_eq!(score_color(90), Color::Green);
        assert_eq!(score_color(89), Color::Yellow);
        assert_eq!(score_color(50), Color::Yellow);
        assert_eq!(score_color(49), Color::Red);
    }

    #[test]
    fn score_bar_is_always_twenty_four_cells() {
        for score in [0u8, 1, 49, 50, 85, 99, 100] {
            let bar = score_bar(score);
            assert_eq!(bar.chars().count(), 24, "score {score}");
        }
        assert_eq!(score_bar(0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(score_bar(50).chars().filter(|c| *c == '█').count(), 12);
        assert_eq!(score_bar(100).chars().filter(|c| *c == '█').count(), 24);
    }

    #[test]
    fn output_mode_parses_case_insensitively() {
        assert_eq!("pretty".parse::<OutputMode>().unwrap(), OutputMode::Pretty);
        assert_eq!("CI".parse::<OutputMode>().unwrap(), OutputMode::Ci);
        assert_eq!("Raw".parse::<OutputMode>().unwrap(), OutputMode::Raw);
        assert!("yaml".parse::<OutputMode>().is_err());
    }

    #[test]
    fn output_mode_display_round_trips() {
        for mode in [OutputMode::Pretty, OutputMode::Ci, OutputMode::Raw] {
            assert_eq!(mode.to_string().parse::<OutputMode>().unwrap(), mode);
        }
    }
}
