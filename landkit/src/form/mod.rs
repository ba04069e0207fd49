//! Contact form validation and submission.
//!
//! - `registry`: field rules and the pure validation function
//! - `field`: per-field state and its rendering
//! - `banner`: success/error banner shown after a submission
//! - `submit`: the submission seam and its retry policy
//! - `data`: collected field values
//! - `report`: whole-payload validation for use outside a page

mod banner;
mod data;
mod field;
mod registry;
mod report;
mod submit;

use std::collections::HashMap;

use landkit_dom::{DomError, NodeId};
use tracing::{debug, error, info, warn};

pub use banner::{ERROR_MESSAGE, MessageKind, SUCCESS_MESSAGE};
pub use data::FormData;
pub use field::FieldState;
pub use registry::{FieldRule, REQUIRED_MESSAGE, ValidatorRegistry, Validity};
pub use report::{FieldError, PayloadReport, validate_payload};
pub use submit::{
    FailingSubmitter, SimulatedSubmitter, SubmissionPolicy, SubmitError, Submitter,
    submit_with_policy,
};

use crate::component::Component;
use crate::config::FormConfig;
use crate::context::{PageContext, SubmissionId};
use crate::error::InitError;
use crate::event::{Event, EventOutcome, Task};
use crate::util::{Debouncer, TimerId, closest, select, select_all};

const LOADING_CLASS: &str = "loading";
const DATA_CONTROLS: &str = "input, textarea, select";
const NON_DATA_TYPES: &[&str] = &["submit", "button", "reset", "image"];

#[derive(Debug, Clone, Copy)]
struct FormAnchors {
    form: NodeId,
    submit: Option<NodeId>,
}

#[derive(Debug, Clone, Copy)]
struct ActiveBanner {
    banner: banner::Banner,
    timer: TimerId,
}

/// Validates fields on blur and (debounced) on input, and turns a valid
/// submit into a queued [`PendingSubmission`](crate::context::PendingSubmission).
///
/// The page delivers the outcome back as [`Task::SubmissionSettled`], which
/// shows the banner and restores the submit control.
#[derive(Debug)]
pub struct ContactForm {
    config: FormConfig,
    registry: &'static ValidatorRegistry,
    anchors: Option<FormAnchors>,
    /// Submit control label captured at init.
    submit_label: String,
    states: HashMap<NodeId, FieldState>,
    debouncers: HashMap<NodeId, Debouncer>,
    in_flight: Vec<SubmissionId>,
    banner: Option<ActiveBanner>,
}

impl ContactForm {
    #[must_use]
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            registry: ValidatorRegistry::standard(),
            anchors: None,
            submit_label: String::new(),
            states: HashMap::new(),
            debouncers: HashMap::new(),
            in_flight: Vec::new(),
            banner: None,
        }
    }

    /// The managed form, once initialized.
    #[must_use]
    pub fn form(&self) -> Option<NodeId> {
        self.anchors.map(|a| a.form)
    }

    /// Last validation state of `field`.
    #[must_use]
    pub fn field_state(&self, field: NodeId) -> FieldState {
        self.states.get(&field).cloned().unwrap_or_default()
    }

    /// Submissions queued by this form and not yet settled.
    #[must_use]
    pub fn in_flight(&self) -> &[SubmissionId] {
        &self.in_flight
    }

    /// The banner currently shown, if any.
    #[must_use]
    pub fn banner(&self) -> Option<NodeId> {
        self.banner.map(|b| b.banner.node)
    }

    fn fields(&self, ctx: &PageContext, form: NodeId) -> Vec<NodeId> {
        select_all(&ctx.document, form, &self.config.field_selector)
    }

    fn is_field(&self, ctx: &PageContext, node: NodeId) -> bool {
        let Some(anchors) = self.anchors else {
            return false;
        };
        ctx.document.contains(anchors.form, node)
            && closest(&ctx.document, node, &self.config.field_selector) == Some(node)
    }

    /// Validate `field` against its current value and render the result.
    /// Returns whether the field is valid.
    pub fn validate_field(&mut self, ctx: &mut PageContext, field: NodeId) -> bool {
        let doc = &mut ctx.document;
        let value = doc.value(field).unwrap_or_default();
        let name = doc.attr(field, "name").unwrap_or_default().to_owned();
        let required = doc.has_attr(field, "required");
        let state = FieldState::from(self.registry.validate(&name, &value, required));

        let group = field::field_group(doc, field, &self.config.group_selector);
        let rendered = field::clear_rendered(doc, field, group)
            .and_then(|()| field::render(doc, field, group, &state));
        if let Err(err) = rendered {
            warn!(field = %name, error = %err, "Failed to render field state");
        }
        debug!(field = %name, valid = !state.is_invalid(), "Validated field");

        let valid = !state.is_invalid();
        self.states.insert(field, state);
        valid
    }

    /// Return `field` to the unvalidated state and remove its rendering.
    pub fn clear_field(&mut self, ctx: &mut PageContext, field: NodeId) {
        let doc = &mut ctx.document;
        let group = field::field_group(doc, field, &self.config.group_selector);
        let cleared = field::clear_rendered(doc, field, group)
            .and_then(|()| field::render(doc, field, group, &FieldState::Unvalidated));
        if let Err(err) = cleared {
            warn!(field = %field, error = %err, "Failed to clear field state");
        }
        self.states.insert(field, FieldState::Unvalidated);
    }

    fn on_input(&mut self, ctx: &mut PageContext, field: NodeId) {
        let delay = self.config.validate_debounce();
        self.debouncers
            .entry(field)
            .or_insert_with(|| Debouncer::new(delay))
            .call(&mut ctx.scheduler, Task::ValidateField(field));
    }

    fn on_submit(&mut self, ctx: &mut PageContext, anchors: FormAnchors) {
        let mut first_invalid = None;
        for field in self.fields(ctx, anchors.form) {
            if !self.validate_field(ctx, field) && first_invalid.is_none() {
                first_invalid = Some(field);
            }
        }
        if let Some(field) = first_invalid {
            info!(field = %field, "Form has invalid fields; submission aborted");
            if let Err(err) = ctx.document.focus(field) {
                warn!(field = %field, error = %err, "Failed to focus invalid field");
            }
            return;
        }

        if let Err(err) = self.set_loading(ctx, anchors, true) {
            warn!(error = %err, "Failed to show loading state");
        }
        let data = Self::collect(ctx, anchors.form);
        let fields = data.len();
        let id = ctx.enqueue_submission(anchors.form, data);
        info!(submission = %id, fields, "Form submission queued");
        self.in_flight.push(id);
    }

    /// Named, enabled controls with their raw values, in document order.
    fn collect(ctx: &PageContext, form: NodeId) -> FormData {
        let doc = &ctx.document;
        select_all(doc, form, DATA_CONTROLS)
            .into_iter()
            .filter(|control| !doc.has_attr(*control, "disabled"))
            .filter(|control| {
                let kind = doc.attr(*control, "type").unwrap_or_default();
                let unchecked = matches!(kind, "checkbox" | "radio") && !doc.has_attr(*control, "checked");
                !NON_DATA_TYPES.contains(&kind) && !unchecked
            })
            .filter_map(|control| {
                let name = doc.attr(control, "name").filter(|n| !n.is_empty())?;
                Some((name.to_owned(), doc.value(control).unwrap_or_default()))
            })
            .collect()
    }

    fn set_loading(
        &self,
        ctx: &mut PageContext,
        anchors: FormAnchors,
        loading: bool,
    ) -> Result<(), DomError> {
        let Some(submit) = anchors.submit else {
            return Ok(());
        };
        let doc = &mut ctx.document;
        let label = if loading {
            doc.set_attr(submit, "disabled", "")?;
            doc.add_class(submit, LOADING_CLASS)?;
            &self.config.sending_label
        } else {
            doc.remove_attr(submit, "disabled")?;
            doc.remove_class(submit, LOADING_CLASS)?;
            &self.submit_label
        };
        if doc.tag_name(submit) == Some("input") {
            doc.set_attr(submit, "value", label)
        } else {
            doc.set_text_content(submit, label)
        }
    }

    fn on_settled(&mut self, ctx: &mut PageContext, id: SubmissionId, result: &Result<(), SubmitError>) {
        let Some(position) = self.in_flight.iter().position(|pending| *pending == id) else {
            return;
        };
        self.in_flight.remove(position);
        let Some(anchors) = self.anchors else {
            return;
        };

        let kind = match result {
            Ok(()) => {
                info!(submission = %id, "Form submitted");
                self.reset(ctx, anchors.form);
                MessageKind::Success
            }
            Err(err) => {
                error!(submission = %id, error = %err, "Form submission failed");
                MessageKind::Error
            }
        };
        if let Err(err) = self.show_message(ctx, anchors.form, kind) {
            warn!(error = %err, "Failed to show submission banner");
        }
        if let Err(err) = self.set_loading(ctx, anchors, false) {
            warn!(error = %err, "Failed to restore submit control");
        }
    }

    fn reset(&mut self, ctx: &mut PageContext, form: NodeId) {
        if let Err(err) = ctx.document.reset_controls(form) {
            warn!(error = %err, "Failed to reset form controls");
        }
        for debouncer in self.debouncers.values_mut() {
            debouncer.cancel(&mut ctx.scheduler);
        }
        for field in self.fields(ctx, form) {
            self.clear_field(ctx, field);
        }
    }

    fn show_message(
        &mut self,
        ctx: &mut PageContext,
        form: NodeId,
        kind: MessageKind,
    ) -> Result<(), DomError> {
        if let Some(previous) = self.banner.take() {
            ctx.scheduler.cancel(previous.timer);
            ctx.document.remove(previous.banner.node)?;
        }
        let banner = banner::show(&mut ctx.document, form, kind)?;
        let timer = ctx
            .scheduler
            .schedule(self.config.message_timeout(), Task::DismissMessage(banner.node));
        self.banner = Some(ActiveBanner { banner, timer });
        Ok(())
    }

    fn dismiss_message(&mut self, ctx: &mut PageContext, node: NodeId) {
        let Some(active) = self.banner.filter(|b| b.banner.node == node) else {
            return;
        };
        self.banner = None;
        ctx.scheduler.cancel(active.timer);
        if let Err(err) = ctx.document.remove(node) {
            warn!(error = %err, "Failed to remove submission banner");
        }
    }
}

impl Component for ContactForm {
    fn name(&self) -> &'static str {
        "form"
    }

    fn init(&mut self, ctx: &mut PageContext) -> Result<(), InitError> {
        let root = ctx.document.root();
        let Some(form) = select(&ctx.document, root, &self.config.form_selector) else {
            warn!(selector = %self.config.form_selector, "Contact form not found; form handling disabled");
            return Ok(());
        };
        let submit = select(&ctx.document, form, &self.config.submit_selector);
        match submit {
            Some(control) => {
                let doc = &ctx.document;
                self.submit_label = if doc.tag_name(control) == Some("input") {
                    doc.attr(control, "value").unwrap_or_default().to_owned()
                } else {
                    doc.text_content(control)
                };
            }
            None => {
                warn!(selector = %self.config.submit_selector, "Submit control not found");
            }
        }
        ctx.document.set_attr(form, "novalidate", "")?;

        self.anchors = Some(FormAnchors { form, submit });
        info!(fields = self.fields(ctx, form).len(), "Contact form ready");
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut PageContext, event: &Event) -> EventOutcome {
        let Some(anchors) = self.anchors else {
            return EventOutcome::default();
        };
        match event {
            Event::Blur { target } if self.is_field(ctx, *target) => {
                self.validate_field(ctx, *target);
            }
            Event::Input { target } if self.is_field(ctx, *target) => {
                self.on_input(ctx, *target);
            }
            Event::Submit { form } if *form == anchors.form => {
                self.on_submit(ctx, anchors);
                return EventOutcome::prevented();
            }
            Event::Click { target } => {
                if let Some(active) = self.banner
                    && ctx.document.contains(active.banner.close, *target)
                {
                    self.dismiss_message(ctx, active.banner.node);
                }
            }
            _ => {}
        }
        EventOutcome::default()
    }

    fn run_task(&mut self, ctx: &mut PageContext, task: &Task) {
        match task {
            Task::ValidateField(field) => {
                let Some(debouncer) = self.debouncers.get_mut(field) else {
                    return;
                };
                debouncer.settle();
                if ctx.document.is_connected(*field) {
                    self.validate_field(ctx, *field);
                }
            }
            Task::DismissMessage(node) => self.dismiss_message(ctx, *node),
            Task::SubmissionSettled { id, result } => self.on_settled(ctx, *id, result),
            Task::NavResizeSettled => {}
        }
    }
}
