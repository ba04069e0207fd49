//! `landkit replay`: run a step script against the standard landing page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use landkit::fixture::standard_page;
use landkit::{
    BootReport, FailingSubmitter, LandingConfig, Page, SimulatedSubmitter, Step, StepRecord,
    SubmissionPolicy, SubmitError, replay,
};
use serde::Serialize;
use tracing::info;

use crate::output::write_json;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON list of steps
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// JSON page configuration; omitted settings keep their defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Latency of each simulated submission attempt
    #[arg(long, value_name = "N", default_value_t = 1000)]
    pub latency_ms: u64,

    /// Reject every submission instead of accepting it
    #[arg(long)]
    pub fail_submissions: bool,
}

/// What a replay printed.
#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct ReplayOutput {
    pub boot: Option<BootReport>,
    pub steps: Vec<StepRecord>,
    /// Final document markup.
    pub html: String,
}

/// # Errors
///
/// Returns an error if the file cannot be read or is not a list of steps.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid script {}", path.display()))
}

/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<LandingConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// Boot the standard page with `config` and replay `steps` on it.
///
/// # Errors
///
/// Returns an error if the page cannot be built or a step's selector
/// matches nothing.
pub async fn replay_session(
    steps: &[Step],
    config: &LandingConfig,
    latency: Duration,
    fail_submissions: bool,
) -> anyhow::Result<ReplayOutput> {
    let mut page = Page::new(standard_page()?, config);
    page.boot();

    let policy = SubmissionPolicy::default();
    let records = if fail_submissions {
        let submitter = FailingSubmitter::new(
            latency,
            SubmitError::Rejected("submissions disabled by --fail-submissions".to_owned()),
        );
        replay(&mut page, steps, &submitter, &policy).await?
    } else {
        replay(&mut page, steps, &SimulatedSubmitter { latency }, &policy).await?
    };

    let doc = &page.context().document;
    Ok(ReplayOutput {
        boot: page.boot_report().cloned(),
        steps: records,
        html: doc.to_html(doc.root()),
    })
}

/// Replay the script and print the result as JSON to stdout.
///
/// # Errors
///
/// Returns an error if an input file is invalid or the replay fails.
pub async fn run(args: &ReplayArgs) -> anyhow::Result<()> {
    let steps = load_script(&args.script)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LandingConfig::default(),
    };
    info!(steps = steps.len(), script = %args.script.display(), "Replaying script");

    let output = replay_session(
        &steps,
        &config,
        Duration::from_millis(args.latency_ms),
        args.fail_submissions,
    )
    .await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_json(&output, &mut out)
}
