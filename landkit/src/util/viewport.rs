//! Viewport intersection: a direct visibility test and an
//! `IntersectionObserver` model.

use std::str::FromStr;

use landkit_dom::{Document, NodeId};
use thiserror::Error;

use crate::context::Viewport;

/// Whether any part of `node` is inside the viewport, with `offset` pixels
/// trimmed off the bottom edge.
#[must_use]
pub fn is_in_viewport(doc: &Document, viewport: &Viewport, node: NodeId, offset: i64) -> bool {
    let rect = doc.rect(node);
    let view = viewport.rect();
    rect.top() <= view.bottom() - offset && rect.bottom() >= view.top()
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid root margin '{input}': {reason}")]
pub struct RootMarginError {
    pub input: String,
    pub reason: String,
}

/// CSS-style margin around the viewport, in pixels. Positive values grow the
/// observed region, negative values shrink it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootMargin {
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub left: i64,
}

impl FromStr for RootMargin {
    type Err = RootMarginError;

    /// Parses one to four lengths with the CSS shorthand rules. Lengths are
    /// `Npx` or a bare `0`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| RootMarginError {
            input: input.to_owned(),
            reason,
        };
        let values = input
            .split_whitespace()
            .map(|token| {
                let number = token.strip_suffix("px").unwrap_or(token);
                if number != token || number == "0" {
                    number
                        .parse::<i64>()
                        .map_err(|_| fail(format!("'{token}' is not a pixel length")))
                } else {
                    Err(fail(format!("'{token}' must use px units")))
                }
            })
            .collect::<Result<Vec<i64>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            }),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            [] => Err(fail("expected at least one length".to_owned())),
            _ => Err(fail(format!("expected 1-4 lengths, got {}", values.len()))),
        }
    }
}

/// One intersection state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    /// Visible fraction of the target's box, in `0.0..=1.0`.
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy)]
struct Observed {
    node: NodeId,
    last: Option<bool>,
}

/// Polling model of `IntersectionObserver`.
///
/// The page calls [`take_records`](Self::take_records) whenever layout or
/// scroll position may have changed. The first call after `observe` always
/// reports the target, like the browser's initial callback.
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    root_margin: RootMargin,
    threshold: f64,
    targets: Vec<Observed>,
}

impl IntersectionObserver {
    #[must_use]
    pub const fn new(root_margin: RootMargin, threshold: f64) -> Self {
        Self {
            root_margin,
            threshold,
            targets: Vec::new(),
        }
    }

    pub fn observe(&mut self, node: NodeId) {
        if !self.targets.iter().any(|t| t.node == node) {
            self.targets.push(Observed { node, last: None });
        }
    }

    pub fn unobserve(&mut self, node: NodeId) {
        self.targets.retain(|t| t.node != node);
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Entries for every connected target whose intersecting state changed.
    // Pixel areas stay far below 2^52, so the f64 conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    pub fn take_records(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let m = self.root_margin;
        let root = viewport.rect().expand(m.top, m.right, m.bottom, m.left);
        let mut entries = Vec::new();

        for target in &mut self.targets {
            if !doc.is_connected(target.node) {
                continue;
            }
            let rect = doc.rect(target.node);
            let ratio = match rect.intersection(&root) {
                None => None,
                Some(_) if rect.area() == 0 => Some(1.0),
                Some(overlap) => Some(overlap.area() as f64 / rect.area() as f64),
            };
            let is_intersecting = ratio.is_some_and(|r| r >= self.threshold);
            if target.last != Some(is_intersecting) {
                target.last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: target.node,
                    is_intersecting,
                    ratio: ratio.unwrap_or(0.0),
                });
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use landkit_dom::Rect;

    use super::*;

    fn doc_with_box(rect: Rect) -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        doc.set_rect(div, rect).unwrap();
        (doc, div)
    }

    // ---- root margin ----

    #[test]
    fn test_root_margin_shorthands() {
        let one: RootMargin = "50px".parse().unwrap();
        assert_eq!(one, RootMargin { top: 50, right: 50, bottom: 50, left: 50 });

        let two: RootMargin = "10px 0".parse().unwrap();
        assert_eq!(two, RootMargin { top: 10, right: 0, bottom: 10, left: 0 });

        let four: RootMargin = "0px 0px -50px 0px".parse().unwrap();
        assert_eq!(four.bottom, -50);
        assert_eq!(four.top, 0);
    }

    #[test]
    fn test_root_margin_rejects_units_and_garbage() {
        let err = "10%".parse::<RootMargin>().unwrap_err();
        assert!(err.reason.contains("px"), "got: {err}");
        assert!("".parse::<RootMargin>().is_err());
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
        assert!("abcpx".parse::<RootMargin>().is_err());
    }

    // ---- viewport test ----

    #[test]
    fn test_is_in_viewport_partial_visibility() {
        let (doc, div) = doc_with_box(Rect::new(0, 700, 100, 200));
        let viewport = Viewport::new(1024, 768);
        assert!(is_in_viewport(&doc, &viewport, div, 0));
        assert!(is_in_viewport(&doc, &viewport, div, 50));
        assert!(!is_in_viewport(&doc, &viewport, div, 100));
    }

    // ---- observer ----

    #[test]
    fn test_initial_record_reports_every_target() {
        let (doc, div) = doc_with_box(Rect::new(0, 2000, 100, 100));
        let mut observer = IntersectionObserver::new(RootMargin::default(), 0.0);
        observer.observe(div);
        let records = observer.take_records(&doc, &Viewport::new(1024, 768));
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_intersecting);
        assert!(observer.take_records(&doc, &Viewport::new(1024, 768)).is_empty());
    }

    #[test]
    fn test_threshold_and_margin() {
        let (doc, div) = doc_with_box(Rect::new(0, 740, 100, 100));
        let mut viewport = Viewport::new(1024, 768);

        // 28px of 100px visible, but the -50px bottom margin hides it.
        let margin: RootMargin = "0px 0px -50px 0px".parse().unwrap();
        let mut observer = IntersectionObserver::new(margin, 0.1);
        observer.observe(div);
        assert!(!observer.take_records(&doc, &viewport)[0].is_intersecting);

        viewport.scroll_to(100, crate::context::ScrollBehavior::Instant);
        let records = observer.take_records(&doc, &viewport);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_intersecting);
        assert!(records[0].ratio > 0.99);
    }

    #[test]
    fn test_positive_margin_loads_early() {
        let (doc, div) = doc_with_box(Rect::new(0, 800, 100, 100));
        let viewport = Viewport::new(1024, 768);
        let mut observer = IntersectionObserver::new("50px".parse().unwrap(), 0.0);
        observer.observe(div);
        assert!(observer.take_records(&doc, &viewport)[0].is_intersecting);
    }

    #[test]
    fn test_unobserve_and_detached_targets() {
        let (mut doc, div) = doc_with_box(Rect::new(0, 0, 100, 100));
        let mut observer = IntersectionObserver::new(RootMargin::default(), 0.0);
        observer.observe(div);
        observer.observe(div);
        assert_eq!(observer.len(), 1);
        doc.remove(div).unwrap();
        assert!(observer.take_records(&doc, &Viewport::default()).is_empty());
        observer.unobserve(div);
        assert!(observer.is_empty());
    }
}
