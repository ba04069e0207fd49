//! Bootstrap and event loop for a page.
//!
//! `Page` owns the context and the components. It initializes them in a
//! fixed order once the document is ready, routes events and due timers to
//! them, runs the browser's default actions for unprevented events, and
//! drives queued submissions through a [`Submitter`].

use std::time::Duration;

use landkit_dom::{Document, NodeId};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::animation::ScrollAnimator;
use crate::component::Component;
use crate::config::{BootPolicy, LandingConfig};
use crate::context::{PageContext, ReadyState, ScrollBehavior, SubmissionId};
use crate::error::PageError;
use crate::event::{Event, EventOutcome, Key, Task};
use crate::form::{ContactForm, SubmissionPolicy, Submitter, submit_with_policy};
use crate::lazy_load::LazyLoader;
use crate::navigation::Navigation;
use crate::smooth_scroll::SmoothScroll;
use crate::util::{closest, select};

/// A component whose init failed.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ComponentFailure {
    pub component: &'static str,
    pub error: String,
}

/// What the bootstrap did.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct BootReport {
    pub initialized: Vec<&'static str>,
    pub failed: Vec<ComponentFailure>,
    /// Components never initialized because an earlier one failed.
    pub skipped: Vec<&'static str>,
}

impl BootReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Outcome of one drained submission.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct SubmissionReport {
    pub id: SubmissionId,
    pub attempts: Option<u32>,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

#[derive(Debug)]
enum BootState {
    NotStarted,
    /// Waiting for `DOMContentLoaded`.
    Deferred,
    Done(BootReport),
}

/// The standard components in init order.
#[must_use]
pub fn standard_components(config: &LandingConfig) -> Vec<Box<dyn Component>> {
    vec![
        Box::new(Navigation::new(config.navigation.clone())),
        Box::new(SmoothScroll::new(config.smooth_scroll.clone())),
        Box::new(LazyLoader::new(config.lazy_load.clone())),
        Box::new(ContactForm::new(config.form.clone())),
        Box::new(ScrollAnimator::new(config.animation.clone())),
    ]
}

pub struct Page {
    ctx: PageContext,
    components: Vec<Box<dyn Component>>,
    initialized: Vec<bool>,
    policy: BootPolicy,
    state: BootState,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("ctx", &self.ctx)
            .field(
                "components",
                &self.components.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("initialized", &self.initialized)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .finish()
    }
}

impl Page {
    /// A page running the standard components.
    #[must_use]
    pub fn new(ctx: PageContext, config: &LandingConfig) -> Self {
        Self::with_components(ctx, standard_components(config), config.boot_policy)
    }

    #[must_use]
    pub fn with_components(
        ctx: PageContext,
        components: Vec<Box<dyn Component>>,
        policy: BootPolicy,
    ) -> Self {
        let initialized = vec![false; components.len()];
        Self {
            ctx,
            components,
            initialized,
            policy,
            state: BootState::NotStarted,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub const fn context_mut(&mut self) -> &mut PageContext {
        &mut self.ctx
    }

    /// The boot report, once init has run.
    #[must_use]
    pub const fn boot_report(&self) -> Option<&BootReport> {
        match &self.state {
            BootState::Done(report) => Some(report),
            BootState::NotStarted | BootState::Deferred => None,
        }
    }

    /// Initialize now, or defer until `DOMContentLoaded` while the document
    /// is still loading. Calling it again has no effect.
    pub fn boot(&mut self) {
        if !matches!(self.state, BootState::NotStarted) {
            return;
        }
        if self.ctx.ready_state() == ReadyState::Loading {
            debug!("Document still loading; deferring init");
            self.state = BootState::Deferred;
        } else {
            self.run_init();
        }
    }

    fn run_init(&mut self) {
        let mut report = BootReport::default();
        let mut stopped = false;
        for (index, component) in self.components.iter_mut().enumerate() {
            let name = component.name();
            if stopped {
                report.skipped.push(name);
                continue;
            }
            match component.init(&mut self.ctx) {
                Ok(()) => {
                    self.initialized[index] = true;
                    report.initialized.push(name);
                }
                Err(err) => {
                    error!(component = name, error = %err, "Component failed to initialize");
                    report.failed.push(ComponentFailure {
                        component: name,
                        error: err.to_string(),
                    });
                    stopped = self.policy == BootPolicy::StopOnError;
                }
            }
        }
        info!(
            initialized = report.initialized.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Page initialized"
        );
        self.state = BootState::Done(report);
    }

    fn broadcast(&mut self, event: &Event) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        for (component, ready) in self.components.iter_mut().zip(&self.initialized) {
            if *ready {
                outcome = outcome.merge(component.handle_event(&mut self.ctx, event));
            }
        }
        outcome
    }

    fn run_task(&mut self, task: &Task) {
        for (component, ready) in self.components.iter_mut().zip(&self.initialized) {
            if *ready {
                component.run_task(&mut self.ctx, task);
            }
        }
    }

    /// Deliver `event` to every initialized component, then run the default
    /// action unless a handler prevented it.
    pub fn dispatch(&mut self, event: &Event) -> EventOutcome {
        debug!(event = ?event, "Dispatching event");
        if *event == Event::DomContentLoaded {
            if self.ctx.ready_state() == ReadyState::Loading {
                self.ctx.set_ready_state(ReadyState::Interactive);
            }
            if matches!(self.state, BootState::Deferred) {
                self.run_init();
            }
        }

        let outcome = self.broadcast(event);
        if !outcome.default_prevented {
            self.default_action(event);
        }
        if *event != Event::Scroll && self.ctx.viewport.take_scrolled() {
            self.broadcast(&Event::Scroll);
        }
        outcome
    }

    fn default_action(&mut self, event: &Event) {
        match event {
            Event::Click { target } => {
                let doc = &self.ctx.document;
                if let Some(control) = closest(doc, *target, "button, input")
                    && is_submit_control(doc, control)
                    && let Some(form) = closest(doc, control, "form")
                {
                    self.dispatch(&Event::Submit { form });
                    return;
                }
                if let Some(link) = closest(doc, *target, "a[href^=\"#\"]") {
                    let fragment = doc
                        .attr(link, "href")
                        .and_then(|href| href.strip_prefix('#'))
                        .unwrap_or_default()
                        .to_owned();
                    let top = doc
                        .element_by_id(&fragment)
                        .map_or(0, |target| doc.rect(target).top());
                    self.ctx.location.push_hash(&fragment);
                    self.ctx.viewport.scroll_to(top, ScrollBehavior::Instant);
                }
            }
            Event::Submit { .. } => {
                debug!("Submit not prevented; counting a native submission");
                self.ctx.record_native_submission();
            }
            _ => {}
        }
    }

    /// Advance the page clock by `by`, running every timer that falls due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.ctx.scheduler.now() + by;
        while let Some((_, task)) = self.ctx.scheduler.pop_due(until) {
            self.run_task(&task);
        }
        self.ctx.scheduler.advance_to(until);
    }

    /// Drain the submission outbox through `submitter`, one submission at a
    /// time. The page clock moves forward by the time each submission took.
    pub async fn settle_submissions<S: Submitter>(
        &mut self,
        submitter: &S,
        policy: &SubmissionPolicy,
    ) -> Vec<SubmissionReport> {
        let mut reports = Vec::new();
        for pending in self.ctx.take_submissions() {
            let start = tokio::time::Instant::now();
            let result = submit_with_policy(submitter, &pending.data, policy).await;
            let elapsed = start.elapsed();
            self.advance(elapsed);

            reports.push(SubmissionReport {
                id: pending.id,
                attempts: result.as_ref().ok().copied(),
                error: result.as_ref().err().map(ToString::to_string),
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            });
            self.run_task(&Task::SubmissionSettled {
                id: pending.id,
                result: result.map(|_| ()),
            });
        }
        reports
    }

    // ---- driver helpers ----

    fn resolve(&self, selector: &str) -> Result<NodeId, PageError> {
        let doc = &self.ctx.document;
        select(doc, doc.root(), selector).ok_or_else(|| PageError::NoMatch(selector.to_owned()))
    }

    /// Move focus to `node`, blurring the previously focused element.
    fn move_focus(&mut self, node: NodeId) -> Result<(), PageError> {
        let previous = self.ctx.document.focused();
        if previous == Some(node) || !self.ctx.document.is_focusable(node) {
            return Ok(());
        }
        if let Some(previous) = previous {
            self.ctx.document.blur();
            self.dispatch(&Event::Blur { target: previous });
        }
        self.ctx.document.focus(node)?;
        Ok(())
    }

    /// Click `node` like a pointer would: focus moves first, then the click
    /// fires. Disabled controls swallow the click.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown nodes.
    pub fn click_node(&mut self, node: NodeId) -> Result<EventOutcome, PageError> {
        if self.ctx.document.has_attr(node, "disabled") {
            debug!(node = %node, "Click on disabled control ignored");
            return Ok(EventOutcome::default());
        }
        self.move_focus(node)?;
        Ok(self.dispatch(&Event::Click { target: node }))
    }

    /// # Errors
    ///
    /// Returns [`PageError::NoMatch`] when nothing matches `selector`.
    pub fn click(&mut self, selector: &str) -> Result<EventOutcome, PageError> {
        let node = self.resolve(selector)?;
        self.click_node(node)
    }

    /// Focus the field, replace its value and fire `input`.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing matches or the element is not a form control.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<EventOutcome, PageError> {
        let node = self.resolve(selector)?;
        self.move_focus(node)?;
        self.ctx.document.set_value(node, text)?;
        Ok(self.dispatch(&Event::Input { target: node }))
    }

    /// Focus the element without clicking it.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NoMatch`] when nothing matches `selector`.
    pub fn focus(&mut self, selector: &str) -> Result<(), PageError> {
        let node = self.resolve(selector)?;
        self.move_focus(node)
    }

    /// Blur the focused element, if any.
    pub fn blur(&mut self) -> EventOutcome {
        let Some(previous) = self.ctx.document.focused() else {
            return EventOutcome::default();
        };
        self.ctx.document.blur();
        self.dispatch(&Event::Blur { target: previous })
    }

    pub fn press_key(&mut self, key: Key) -> EventOutcome {
        self.dispatch(&Event::KeyDown { key })
    }

    pub fn scroll_to(&mut self, top: i64) -> EventOutcome {
        self.ctx.viewport.scroll_to(top, ScrollBehavior::Instant);
        self.ctx.viewport.take_scrolled();
        self.dispatch(&Event::Scroll)
    }

    pub fn resize(&mut self, width: i64, height: i64) -> EventOutcome {
        self.ctx.viewport.resize(width, height);
        self.dispatch(&Event::Resize)
    }

    /// Fire `submit` on the form, as `form.requestSubmit()` would.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NoMatch`] when nothing matches `selector`.
    pub fn submit(&mut self, selector: &str) -> Result<EventOutcome, PageError> {
        let form = self.resolve(selector)?;
        Ok(self.dispatch(&Event::Submit { form }))
    }
}

/// `button` without a type, `button[type=submit]` or `input[type=submit]`,
/// not disabled.
fn is_submit_control(doc: &Document, node: NodeId) -> bool {
    if doc.has_attr(node, "disabled") {
        return false;
    }
    let kind = doc.attr(node, "type");
    match doc.tag_name(node) {
        Some("button") => matches!(kind, None | Some("submit")),
        Some("input") => kind == Some("submit"),
        _ => false,
    }
}
