//! Utility layer shared by the page components.
//!
//! - `timing`: virtual clock, debounce and throttle
//! - `query`: selector helpers that treat bad selectors as absent elements
//! - `viewport`: viewport test and the intersection observer model

pub mod query;
pub mod timing;
pub mod viewport;

pub use query::{closest, select, select_all};
pub use timing::{Debouncer, Scheduler, Throttle, TimerId};
pub use viewport::{
    IntersectionEntry, IntersectionObserver, RootMargin, RootMarginError, is_in_viewport,
};
