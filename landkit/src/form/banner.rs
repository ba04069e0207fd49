//! Dismissible success/error banner shown after a submission.

use landkit_dom::{Document, DomError, NodeId};
use serde::Serialize;

pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your message has been sent successfully. We'll get back to you soon.";
pub const ERROR_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again later.";

const BANNER_CLASS: &str = "form-message";
const CLOSE_CLASS: &str = "form-message__close";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Success => SUCCESS_MESSAGE,
            Self::Error => ERROR_MESSAGE,
        }
    }

    const fn role(self) -> &'static str {
        match self {
            Self::Success => "status",
            Self::Error => "alert",
        }
    }

    const fn politeness(self) -> &'static str {
        match self {
            Self::Success => "polite",
            Self::Error => "assertive",
        }
    }
}

/// A banner currently in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Banner {
    pub node: NodeId,
    pub close: NodeId,
}

/// Build the banner and insert it right before `form`.
///
/// # Errors
///
/// Returns an error if `form` is detached or a DOM mutation fails.
pub(super) fn show(doc: &mut Document, form: NodeId, kind: MessageKind) -> Result<Banner, DomError> {
    let parent = doc
        .parent(form)
        .ok_or_else(|| DomError::HierarchyRequest(format!("form {form} has no parent")))?;

    let node = doc.create_element("div");
    doc.add_class(node, BANNER_CLASS)?;
    doc.add_class(node, kind.class())?;
    doc.set_attr(node, "role", kind.role())?;
    doc.set_attr(node, "aria-live", kind.politeness())?;

    let text = doc.append_element(node, "p")?;
    doc.set_text_content(text, kind.text())?;

    let close = doc.append_element(node, "button")?;
    doc.add_class(close, CLOSE_CLASS)?;
    doc.set_attr(close, "type", "button")?;
    doc.set_attr(close, "aria-label", "Dismiss message")?;
    doc.set_text_content(close, "\u{00d7}")?;

    doc.insert_before(parent, node, Some(form))?;
    Ok(Banner { node, close })
}
