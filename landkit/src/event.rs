//! Events routed to components and timer tasks scheduled by them.

use landkit_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::context::SubmissionId;
use crate::form::SubmitError;

/// Keyboard keys the components react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` name to a [`Key`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A DOM event delivered to every initialized component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DomContentLoaded,
    Click { target: NodeId },
    Input { target: NodeId },
    Blur { target: NodeId },
    Submit { form: NodeId },
    KeyDown { key: Key },
    /// The viewport scroll position changed.
    Scroll,
    /// The viewport size changed.
    Resize,
}

impl Event {
    #[must_use]
    pub const fn target(&self) -> Option<NodeId> {
        match self {
            Self::Click { target } | Self::Input { target } | Self::Blur { target } => {
                Some(*target)
            }
            Self::Submit { form } => Some(*form),
            _ => None,
        }
    }
}

/// What the handlers did with an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    /// A handler called the equivalent of `preventDefault()`.
    pub default_prevented: bool,
}

impl EventOutcome {
    #[must_use]
    pub const fn prevented() -> Self {
        Self {
            default_prevented: true,
        }
    }

    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            default_prevented: self.default_prevented || other.default_prevented,
        }
    }
}

/// Deferred work, either scheduled on the page clock or delivered by the page
/// when an asynchronous submission finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Debounced validation of one form field.
    ValidateField(NodeId),
    /// Auto-dismissal of a submission banner.
    DismissMessage(NodeId),
    /// Debounced handling of a viewport resize by the navigation.
    NavResizeSettled,
    /// An outboxed submission finished.
    SubmissionSettled {
        id: SubmissionId,
        result: Result<(), SubmitError>,
    },
}
