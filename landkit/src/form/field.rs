//! Per-field validation state and its rendering.

use landkit_dom::{Document, DomError, NodeId};
use serde::Serialize;

use crate::form::registry::Validity;
use crate::util::{closest, select_all};

pub const ERROR_CLASS: &str = "error";
pub const SUCCESS_CLASS: &str = "success";
pub const ERROR_MESSAGE_CLASS: &str = "error-message";

/// Validation state of one field.
///
/// A field starts `Unvalidated`. Every validation moves it straight to
/// `Valid` or `Invalid`; only an explicit clear returns it to `Unvalidated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum FieldState {
    #[default]
    Unvalidated,
    Valid,
    Invalid(String),
}

impl From<Validity> for FieldState {
    fn from(validity: Validity) -> Self {
        match validity {
            Validity::Valid => Self::Valid,
            Validity::Invalid(message) => Self::Invalid(message),
        }
    }
}

impl FieldState {
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Container holding the field, its label and its error slot.
pub(super) fn field_group(doc: &Document, field: NodeId, group_selector: &str) -> Option<NodeId> {
    closest(doc, field, group_selector).or_else(|| doc.parent_element(field))
}

fn error_id(doc: &Document, field: NodeId) -> String {
    let base = doc
        .id(field)
        .or_else(|| doc.attr(field, "name"))
        .map_or_else(|| format!("field-{}", field.index()), str::to_owned);
    format!("{base}-error")
}

/// Remove the styling and ARIA state of a previous validation. The error
/// slot itself is left for [`render`] to reuse or drop.
///
/// # Errors
///
/// Returns an error if `field` is not an element.
pub(super) fn clear_rendered(
    doc: &mut Document,
    field: NodeId,
    group: Option<NodeId>,
) -> Result<(), DomError> {
    if let Some(group) = group {
        doc.remove_class(group, ERROR_CLASS)?;
        doc.remove_class(group, SUCCESS_CLASS)?;
    }
    doc.remove_attr(field, "aria-invalid")?;
    let id = error_id(doc, field);
    set_described_by(doc, field, &id, false)
}

/// Add or drop `id` in the field's `aria-describedby` list, keeping any
/// other ids the markup put there.
fn set_described_by(
    doc: &mut Document,
    field: NodeId,
    id: &str,
    linked: bool,
) -> Result<(), DomError> {
    let mut tokens: Vec<String> = doc
        .attr(field, "aria-describedby")
        .unwrap_or_default()
        .split_ascii_whitespace()
        .filter(|token| *token != id)
        .map(str::to_owned)
        .collect();
    if linked {
        tokens.push(id.to_owned());
    }
    if tokens.is_empty() {
        doc.remove_attr(field, "aria-describedby")?;
        Ok(())
    } else {
        doc.set_attr(field, "aria-describedby", &tokens.join(" "))
    }
}

/// Render `state` onto a field whose previous styling was cleared.
///
/// An invalid field keeps a single `.error-message` slot in its group,
/// reused across validations. Any other state removes the slot.
///
/// # Errors
///
/// Returns an error if a DOM mutation fails.
pub(super) fn render(
    doc: &mut Document,
    field: NodeId,
    group: Option<NodeId>,
    state: &FieldState,
) -> Result<(), DomError> {
    let mut slots = group
        .map(|group| select_all(doc, group, &format!(".{ERROR_MESSAGE_CLASS}")))
        .unwrap_or_default()
        .into_iter();
    let reused = match state {
        FieldState::Invalid(_) => slots.next(),
        FieldState::Unvalidated | FieldState::Valid => None,
    };
    for stale in slots {
        doc.remove(stale)?;
    }

    match state {
        FieldState::Unvalidated => Ok(()),
        FieldState::Valid => {
            if let Some(group) = group {
                doc.add_class(group, SUCCESS_CLASS)?;
            }
            doc.set_attr(field, "aria-invalid", "false")
        }
        FieldState::Invalid(message) => {
            doc.set_attr(field, "aria-invalid", "true")?;
            let Some(group) = group else {
                return Ok(());
            };
            doc.add_class(group, ERROR_CLASS)?;
            let id = error_id(doc, field);
            let slot = if let Some(slot) = reused {
                slot
            } else {
                let slot = doc.append_element(group, "span")?;
                doc.add_class(slot, ERROR_MESSAGE_CLASS)?;
                slot
            };
            doc.set_attr(slot, "id", &id)?;
            doc.set_attr(slot, "role", "alert")?;
            doc.set_text_content(slot, message)?;
            set_described_by(doc, field, &id, true)
        }
    }
}
