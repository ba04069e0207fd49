//! The contract every page module implements.

use crate::context::PageContext;
use crate::error::InitError;
use crate::event::{Event, EventOutcome, Task};

/// A page module driven by the [`Page`](crate::Page) bootstrap.
///
/// `init` runs once, after the document is ready. Event and task handlers
/// only run on components whose `init` succeeded. Handlers never return
/// errors: DOM failures inside them are logged and the handler gives up.
pub trait Component {
    /// Stable name used in logs and boot reports.
    fn name(&self) -> &'static str;

    /// Locate anchors, attach state and render the initial markup.
    ///
    /// Missing anchors are not an error: the component logs a warning and
    /// stays inert.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration or a failed DOM mutation.
    fn init(&mut self, ctx: &mut PageContext) -> Result<(), InitError>;

    /// React to a dispatched event.
    fn handle_event(&mut self, _ctx: &mut PageContext, _event: &Event) -> EventOutcome {
        EventOutcome::default()
    }

    /// Run a task that fell due. Tasks are broadcast, so components ignore
    /// the ones they did not schedule.
    fn run_task(&mut self, _ctx: &mut PageContext, _task: &Task) {}
}
