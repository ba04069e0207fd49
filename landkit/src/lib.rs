pub mod animation;
pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod fixture;
pub mod form;
pub mod lazy_load;
pub mod navigation;
pub mod page;
pub mod script;
pub mod smooth_scroll;
pub mod styles;
pub mod util;

// Test modules - add any new *_tests.rs files here
#[cfg(test)]
mod form_tests;


#[cfg(test)]
mod page_tests;

// Re-export commonly used types
pub use animation::ScrollAnimator;
pub use component::Component;
pub use config::{
    AnimationConfig, BootPolicy, FormConfig, LandingConfig, LazyLoadConfig, NavigationConfig,
    SmoothScrollConfig,
};
pub use context::{
    Capabilities, Location, PageContext, PendingSubmission, ReadyState, ScrollBehavior,
    ScrollRequest, SubmissionId, Viewport,
};
pub use error::{InitError, PageError};
pub use event::{Event, EventOutcome, Key, Task};
pub use form::{
    ContactForm, FailingSubmitter, FieldError, FieldState, FormData, MessageKind, PayloadReport,
    SimulatedSubmitter, SubmissionPolicy, SubmitError, Submitter, ValidatorRegistry, Validity,
    submit_with_policy, validate_payload,
};
pub use landkit_dom::{Document, DomError, NodeId, Rect};
pub use lazy_load::LazyLoader;
pub use navigation::Navigation;
pub use page::{BootReport, ComponentFailure, Page, SubmissionReport, standard_components};
pub use script::{Step, StepRecord, replay};
pub use smooth_scroll::SmoothScroll;
