//! The environment handle passed to every component.
//!
//! `PageContext` stands in for the browser globals: it owns the document,
//! the viewport, the timer clock, feature detection results, the location
//! hash and the queue of submissions waiting for the async seam.

use std::collections::VecDeque;
use std::fmt;

use landkit_dom::{Document, NodeId, Rect};
use serde::Serialize;

use crate::form::FormData;
use crate::util::Scheduler;

/// `document.readyState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Loading,
    Interactive,
    /// Headless documents are fully built before they are handed over.
    #[default]
    Complete,
}

/// Feature detection results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Capabilities {
    pub intersection_observer: bool,
    /// CSS `scroll-behavior: smooth` support.
    pub smooth_scroll: bool,
    /// `prefers-reduced-motion: reduce`.
    pub prefers_reduced_motion: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            smooth_scroll: true,
            prefers_reduced_motion: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// One `window.scrollTo` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub top: i64,
    pub behavior: ScrollBehavior,
}

/// The visible window onto the document.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: i64,
    height: i64,
    scroll_x: i64,
    scroll_y: i64,
    history: Vec<ScrollRequest>,
    scrolled: bool,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0,
            scroll_y: 0,
            history: Vec::new(),
            scrolled: false,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i64 {
        self.height
    }

    #[must_use]
    pub const fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    /// The visible region in document coordinates.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Scroll vertically. Negative positions clamp to the top.
    pub fn scroll_to(&mut self, top: i64, behavior: ScrollBehavior) {
        let top = top.max(0);
        self.history.push(ScrollRequest { top, behavior });
        if top != self.scroll_y {
            self.scroll_y = top;
            self.scrolled = true;
        }
    }

    pub const fn resize(&mut self, width: i64, height: i64) {
        self.width = width;
        self.height = height;
    }

    /// Every scroll request made so far, oldest first.
    #[must_use]
    pub fn scroll_history(&self) -> &[ScrollRequest] {
        &self.history
    }

    /// Whether the position changed since the last call.
    pub const fn take_scrolled(&mut self) -> bool {
        let scrolled = self.scrolled;
        self.scrolled = false;
        scrolled
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// `window.location` and `history`, reduced to the fragment.
#[derive(Debug, Clone, Default)]
pub struct Location {
    hash: String,
    history_len: usize,
}

impl Location {
    /// Current fragment without the leading `#`.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// `history.pushState(null, '', '#' + fragment)`.
    pub fn push_hash(&mut self, fragment: &str) {
        fragment.clone_into(&mut self.hash);
        self.history_len += 1;
    }

    /// Number of entries pushed onto the session history.
    #[must_use]
    pub const fn history_len(&self) -> usize {
        self.history_len
    }
}

/// Identifier of one outboxed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubmissionId(u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "submission-{}", self.0)
    }
}

/// Form data waiting to be handed to a [`Submitter`](crate::form::Submitter).
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub form: NodeId,
    pub data: FormData,
}

/// Environment handle shared by all components of a page.
#[derive(Debug)]
pub struct PageContext {
    pub document: Document,
    pub viewport: Viewport,
    pub scheduler: Scheduler,
    pub capabilities: Capabilities,
    pub location: Location,
    ready_state: ReadyState,
    outbox: VecDeque<PendingSubmission>,
    next_submission: u64,
    native_submissions: usize,
}

impl PageContext {
    #[must_use]
    pub fn new(document: Document, viewport: Viewport) -> Self {
        Self {
            document,
            viewport,
            scheduler: Scheduler::default(),
            capabilities: Capabilities::default(),
            location: Location::default(),
            ready_state: ReadyState::default(),
            outbox: VecDeque::new(),
            next_submission: 0,
            native_submissions: 0,
        }
    }

    #[must_use]
    pub const fn with_ready_state(mut self, state: ReadyState) -> Self {
        self.ready_state = state;
        self
    }

    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub const fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Queue form data for submission and return its id.
    pub fn enqueue_submission(&mut self, form: NodeId, data: FormData) -> SubmissionId {
        let id = SubmissionId(self.next_submission);
        self.next_submission += 1;
        self.outbox.push_back(PendingSubmission { id, form, data });
        id
    }

    /// Drain the outbox in FIFO order.
    pub fn take_submissions(&mut self) -> Vec<PendingSubmission> {
        self.outbox.drain(..).collect()
    }

    #[must_use]
    pub fn pending_submissions(&self) -> usize {
        self.outbox.len()
    }

    /// Count a submit event whose default action was not prevented.
    pub const fn record_native_submission(&mut self) {
        self.native_submissions += 1;
    }

    /// Number of forms the "browser" would have submitted itself.
    #[must_use]
    pub const fn native_submissions(&self) -> usize {
        self.native_submissions
    }
}
