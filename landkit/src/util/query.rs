//! Defensive DOM query helpers.
//!
//! Selector errors stop here: they are logged and reported as "no element",
//! so a bad selector in configuration never takes a component down.

use landkit_dom::{Document, NodeId};
use tracing::warn;

/// First element under `scope` matching `selector`.
#[must_use]
pub fn select(doc: &Document, scope: NodeId, selector: &str) -> Option<NodeId> {
    match doc.query_selector(scope, selector) {
        Ok(found) => found,
        Err(err) => {
            warn!(selector, error = %err, "Selector query failed; treating element as absent");
            None
        }
    }
}

/// All elements under `scope` matching `selector`.
#[must_use]
pub fn select_all(doc: &Document, scope: NodeId, selector: &str) -> Vec<NodeId> {
    match doc.query_selector_all(scope, selector) {
        Ok(found) => found,
        Err(err) => {
            warn!(selector, error = %err, "Selector query failed; treating elements as absent");
            Vec::new()
        }
    }
}

/// Nearest inclusive ancestor of `node` matching `selector`.
#[must_use]
pub fn closest(doc: &Document, node: NodeId, selector: &str) -> Option<NodeId> {
    match doc.closest(node, selector) {
        Ok(found) => found,
        Err(err) => {
            warn!(selector, error = %err, "Selector match failed; treating element as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_is_absent() {
        let mut doc = Document::new();
        let body = doc.body();
        let link = doc.append_element(body, "a").unwrap();
        assert_eq!(select(&doc, doc.root(), "a::before"), None);
        assert!(select_all(&doc, doc.root(), "[").is_empty());
        assert_eq!(closest(&doc, link, "a:hover"), None);
        assert_eq!(select(&doc, doc.root(), "a"), Some(link));
    }
}
