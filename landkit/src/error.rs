//! Error types for component initialization and page driving.

use landkit_dom::DomError;
use thiserror::Error;

/// A component failed to initialize.
///
/// Missing DOM anchors are NOT errors: components log a warning and stay
/// inert. These variants cover structural failures and bad configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InitError {
    #[error("DOM operation failed: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid {component} configuration: {reason}")]
    Config {
        /// Name of the component whose configuration was rejected.
        component: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },
}

/// Errors from the [`Page`](crate::Page) driver helpers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PageError {
    #[error("No element matches '{0}'")]
    NoMatch(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}
