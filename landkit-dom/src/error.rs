//! Error types for document operations.

use thiserror::Error;

use crate::NodeId;

/// Errors from document mutation and selector queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DomError {
    /// The node id does not belong to this document.
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// The operation needs an element but the node is a text or document node.
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// The operation needs an `input`, `textarea` or `select` element.
    #[error("Node {0} is not a form control")]
    NotAFormControl(NodeId),

    /// The selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The raw selector text.
        selector: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// The tree mutation would produce an invalid hierarchy (cycles,
    /// children under text nodes, removing the root).
    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),
}
