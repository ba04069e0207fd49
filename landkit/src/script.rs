//! Scripted page sessions.
//!
//! A script is a JSON list of steps such as
//! `{"action": "type", "selector": "#contact-name", "text": "Jane"}`.
//! [`replay`] runs them against a [`Page`] and records what each one did.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PageError;
use crate::event::{EventOutcome, Key};
use crate::form::{SubmissionPolicy, Submitter};
use crate::page::{Page, SubmissionReport};

/// One user or clock action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Click { selector: String },
    Type { selector: String, text: String },
    /// Blur the focused element.
    Blur,
    /// Press a key by its `KeyboardEvent.key` name.
    Key { key: String },
    Scroll { top: i64 },
    Resize { width: i64, height: i64 },
    /// Advance the page clock.
    Wait { ms: u64 },
    Submit { selector: String },
    /// Drain queued submissions through the submitter.
    Settle,
}

/// What one step did.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct StepRecord {
    pub index: usize,
    pub step: Step,
    pub default_prevented: bool,
    /// Page clock after the step.
    pub clock_ms: u64,
    /// Submissions settled by a `settle` step.
    pub submissions: Vec<SubmissionReport>,
    /// Element focused after the step, as HTML id or tag.
    pub focused: Option<String>,
}

fn focused_label(page: &Page) -> Option<String> {
    let doc = &page.context().document;
    let node = doc.focused()?;
    doc.id(node)
        .map(|id| format!("#{id}"))
        .or_else(|| doc.tag_name(node).map(str::to_owned))
}

/// Run `steps` in order against `page`.
///
/// # Errors
///
/// Stops at the first step whose selector matches nothing.
pub async fn replay<S: Submitter>(
    page: &mut Page,
    steps: &[Step],
    submitter: &S,
    policy: &SubmissionPolicy,
) -> Result<Vec<StepRecord>, PageError> {
    let mut records = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        debug!(index, step = ?step, "Replaying step");
        let mut submissions = Vec::new();
        let outcome = match step {
            Step::Click { selector } => page.click(selector)?,
            Step::Type { selector, text } => page.type_text(selector, text)?,
            Step::Blur => page.blur(),
            Step::Key { key } => page.press_key(Key::from_name(key)),
            Step::Scroll { top } => page.scroll_to(*top),
            Step::Resize { width, height } => page.resize(*width, *height),
            Step::Wait { ms } => {
                page.advance(Duration::from_millis(*ms));
                EventOutcome::default()
            }
            Step::Submit { selector } => page.submit(selector)?,
            Step::Settle => {
                submissions = page.settle_submissions(submitter, policy).await;
                EventOutcome::default()
            }
        };
        let clock = page.context().scheduler.now();
        records.push(StepRecord {
            index,
            step: step.clone(),
            default_prevented: outcome.default_prevented,
            clock_ms: u64::try_from(clock.as_millis()).unwrap_or(u64::MAX),
            submissions,
            focused: focused_label(page),
        });
    }
    Ok(records)
}
