use std::path::PathBuf;
use std::process::ExitCode;

use a11y_gate_core::{
    normalize, render, FileScanSource, HttpScanSource, OutputMode, ScanSettings, ScanSource,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "a11y-gate",
    author,
    version,
    about = "Accessibility scan gate for CI pipelines"
)]
struct Cli {
    /// Page URL to scan; bare hosts are assumed to be https
    #[arg(value_name = "URL")]
    url: String,

    /// Minimum passing score (0-100); scores below it exit 1
    #[arg(
        long,
        value_name = "SCORE",
        default_value_t = 80.0,
        value_parser = parse_threshold
    )]
    threshold: f64,

    /// Output mode: pretty, ci, or raw
    #[arg(
        long,
        value_name = "MODE",
        default_value = "pretty",
        value_parser = parse_mode
    )]
    mode: OutputMode,

    /// Scan service base URL (overrides A11Y_GATE_ENDPOINT)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// HTTP timeout in seconds (overrides A11Y_GATE_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Render a saved scan payload instead of calling the service
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Disable ANSI colors in pretty output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    // Exit codes are part of the contract: 0 passed, 1 failed the gate,
    // 2 the scan itself went wrong (and clap uses 2 for usage errors).
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let target = normalize_target(&cli.url)?;

    let source: Box<dyn ScanSource> = match &cli.from_file {
        Some(path) => Box::new(FileScanSource::new(path.clone())),
        None => {
            let mut settings = ScanSettings::from_env();
            if let Some(endpoint) = cli.endpoint.clone() {
                settings.endpoint = Some(endpoint);
            }
            if let Some(timeout) = cli.timeout_secs {
                settings.timeout_secs = Some(timeout);
            }
            let client =
                HttpScanSource::new(&settings).context("failed to build the scan client")?;
            Box::new(client)
        }
    };

    let payload = source
        .fetch(&target)
        .await
        .with_context(|| format!("scan of {target} failed"))?;

    let report = normalize(&payload, &target);
    let rendered = render(&report, &payload, cli.mode, &target, cli.threshold);
    debug!(passed = rendered.passed, mode = %cli.mode, "rendered scan verdict");
    println!("{}", rendered.text);
    Ok(rendered.passed)
}

/// Validate the target URL, accepting bare hosts by assuming https.
///
/// The accepted string is returned as typed, not re-serialized, so the
/// rendered output and the fallback report link show what the user asked
/// for.
fn normalize_target(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("target URL must not be empty");
    }
    let (candidate, parsed) = match Url::parse(trimmed) {
        Ok(parsed) => (trimmed.to_string(), parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let candidate = format!("https://{trimmed}");
            let parsed =
                Url::parse(&candidate).with_context(|| format!("`{input}` is not a valid URL"))?;
            (candidate, parsed)
        }
        Err(err) => {
            return Err(err).with_context(|| format!("`{input}` is not a valid URL"));
        }
    };
    match parsed.scheme() {
        "http" | "https" => Ok(candidate),
        other => bail!("unsupported URL scheme `{other}` in `{input}`"),
    }
}

fn parse_mode(raw: &str) -> Result<OutputMode, String> {
    raw.parse()
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if !value.is_finite() {
        return Err(format!("threshold must be a finite number, got `{raw}`"));
    }
    Ok(value)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
