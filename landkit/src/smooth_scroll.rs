//! Offset-aware scrolling for same-page anchor links.

use landkit_dom::{DomError, NodeId};
use tracing::{debug, warn};

use crate::component::Component;
use crate::config::SmoothScrollConfig;
use crate::context::{PageContext, ScrollBehavior};
use crate::error::InitError;
use crate::event::{Event, EventOutcome};
use crate::util::{closest, select};

/// Scrolls to the fragment target of a clicked `#anchor`, leaving room for
/// the fixed header, and moves focus to the target.
#[derive(Debug)]
pub struct SmoothScroll {
    config: SmoothScrollConfig,
}

impl SmoothScroll {
    #[must_use]
    pub const fn new(config: SmoothScrollConfig) -> Self {
        Self { config }
    }

    /// Document offset that puts `target` just below the header.
    fn scroll_offset(&self, ctx: &PageContext, target: NodeId) -> i64 {
        let doc = &ctx.document;
        let header_height = select(doc, doc.root(), &self.config.header_selector)
            .map_or(0, |header| doc.rect(header).height);
        (doc.rect(target).top() - header_height - self.config.extra_offset_px).max(0)
    }

    fn scroll_to_target(&self, ctx: &mut PageContext, fragment: &str, target: NodeId) -> Result<(), DomError> {
        let top = self.scroll_offset(ctx, target);
        let behavior = if ctx.capabilities.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        };
        ctx.viewport.scroll_to(top, behavior);
        ctx.location.push_hash(fragment);

        let doc = &mut ctx.document;
        if !doc.is_focusable(target) {
            doc.set_attr(target, "tabindex", "-1")?;
        }
        doc.focus(target)?;
        debug!(fragment, top, "Scrolled to anchor target");
        Ok(())
    }
}

impl Component for SmoothScroll {
    fn name(&self) -> &'static str {
        "smooth_scroll"
    }

    fn init(&mut self, _ctx: &mut PageContext) -> Result<(), InitError> {
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut PageContext, event: &Event) -> EventOutcome {
        let Event::Click { target } = event else {
            return EventOutcome::default();
        };
        let Some(link) = closest(&ctx.document, *target, &self.config.link_selector) else {
            return EventOutcome::default();
        };
        let Some(fragment) = ctx
            .document
            .attr(link, "href")
            .and_then(|href| href.strip_prefix('#'))
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_owned)
        else {
            return EventOutcome::default();
        };
        let Some(destination) = ctx.document.element_by_id(&fragment) else {
            debug!(fragment = %fragment, "Anchor target not found; leaving click alone");
            return EventOutcome::default();
        };

        if let Err(err) = self.scroll_to_target(ctx, &fragment, destination) {
            warn!(fragment = %fragment, error = %err, "Failed to focus anchor target");
        }
        EventOutcome::prevented()
    }
}

#[cfg(test)]
mod tests {
    use landkit_dom::{Document, Rect};

    use super::*;
    use crate::context::Viewport;

    fn page_with_anchor() -> (PageContext, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let header = doc.append_element(body, "header").unwrap();
        doc.set_rect(header, Rect::new(0, 0, 1280, 80)).unwrap();
        let link = doc.append_element(header, "a").unwrap();
        doc.set_attr(link, "href", "#pricing").unwrap();
        let section = doc.append_element(body, "section").unwrap();
        doc.set_attr(section, "id", "pricing").unwrap();
        doc.set_rect(section, Rect::new(0, 1700, 1280, 600)).unwrap();
        (PageContext::new(doc, Viewport::default()), link, section)
    }

    #[test]
    fn test_scrolls_below_header_and_focuses_target() {
        let (mut ctx, link, section) = page_with_anchor();
        let mut scroll = SmoothScroll::new(SmoothScrollConfig::default());
        let outcome = scroll.handle_event(&mut ctx, &Event::Click { target: link });

        assert!(outcome.default_prevented);
        assert_eq!(ctx.viewport.scroll_y(), 1620);
        assert_eq!(
            ctx.viewport.scroll_history().last().map(|r| r.behavior),
            Some(ScrollBehavior::Smooth)
        );
        assert_eq!(ctx.location.hash(), "pricing");
        assert_eq!(ctx.document.attr(section, "tabindex"), Some("-1"));
        assert_eq!(ctx.document.focused(), Some(section));
    }

    #[test]
    fn test_missing_target_is_not_prevented() {
        let (mut ctx, link, _) = page_with_anchor();
        ctx.document.set_attr(link, "href", "#nowhere").unwrap();
        let mut scroll = SmoothScroll::new(SmoothScrollConfig::default());
        let outcome = scroll.handle_event(&mut ctx, &Event::Click { target: link });
        assert!(!outcome.default_prevented);
        assert_eq!(ctx.viewport.scroll_y(), 0);
    }

    #[test]
    fn test_bare_hash_is_ignored() {
        let (mut ctx, link, _) = page_with_anchor();
        ctx.document.set_attr(link, "href", "#").unwrap();
        let mut scroll = SmoothScroll::new(SmoothScrollConfig::default());
        let outcome = scroll.handle_event(&mut ctx, &Event::Click { target: link });
        assert!(!outcome.default_prevented);
        assert_eq!(ctx.location.history_len(), 0);
    }

    #[test]
    fn test_instant_scroll_without_smooth_support() {
        let (ctx, link, _) = page_with_anchor();
        let mut caps = ctx.capabilities;
        caps.smooth_scroll = false;
        let mut ctx = ctx.with_capabilities(caps);
        let mut scroll = SmoothScroll::new(SmoothScrollConfig::default());
        let _ = scroll.handle_event(&mut ctx, &Event::Click { target: link });
        assert_eq!(
            ctx.viewport.scroll_history().last().map(|r| r.behavior),
            Some(ScrollBehavior::Instant)
        );
    }
}
