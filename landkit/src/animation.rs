//! Scroll-triggered reveal animations.

use landkit_dom::NodeId;
use tracing::{debug, info, warn};

use crate::component::Component;
use crate::config::AnimationConfig;
use crate::context::PageContext;
use crate::error::InitError;
use crate::event::{Event, EventOutcome};
use crate::styles::{ANIMATION_STYLES, ANIMATION_STYLES_ID, inject_style};
use crate::util::{IntersectionObserver, RootMargin, Throttle, is_in_viewport, select_all};

#[derive(Debug)]
enum Mode {
    /// Init has not run or found nothing to animate.
    Idle,
    Observer(IntersectionObserver),
    /// Throttled scroll polling for environments without intersection support.
    Fallback { pending: Vec<NodeId>, throttle: Throttle },
}

/// Adds the visible class to `.animate-on-scroll` elements as they enter
/// the viewport. Each element is revealed once.
#[derive(Debug)]
pub struct ScrollAnimator {
    config: AnimationConfig,
    mode: Mode,
    revealed: usize,
}

impl ScrollAnimator {
    #[must_use]
    pub const fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            mode: Mode::Idle,
            revealed: 0,
        }
    }

    #[must_use]
    pub const fn revealed(&self) -> usize {
        self.revealed
    }

    /// Elements not yet revealed.
    #[must_use]
    pub fn pending(&self) -> usize {
        match &self.mode {
            Mode::Idle => 0,
            Mode::Observer(observer) => observer.len(),
            Mode::Fallback { pending, .. } => pending.len(),
        }
    }

    fn reveal(&mut self, ctx: &mut PageContext, node: NodeId) {
        match ctx.document.add_class(node, &self.config.visible_class) {
            Ok(()) => self.revealed += 1,
            Err(err) => warn!(node = %node, error = %err, "Failed to reveal element"),
        }
    }

    fn check(&mut self, ctx: &mut PageContext) {
        let ready: Vec<NodeId> = match &mut self.mode {
            Mode::Idle => return,
            Mode::Observer(observer) => {
                let ready: Vec<NodeId> = observer
                    .take_records(&ctx.document, &ctx.viewport)
                    .into_iter()
                    .filter(|entry| entry.is_intersecting)
                    .map(|entry| entry.target)
                    .collect();
                for node in &ready {
                    observer.unobserve(*node);
                }
                ready
            }
            Mode::Fallback { pending, throttle } => {
                if !throttle.try_acquire(ctx.scheduler.now()) {
                    return;
                }
                let offset = self.config.fallback_offset_px;
                let (ready, waiting): (Vec<NodeId>, Vec<NodeId>) = pending
                    .iter()
                    .copied()
                    .partition(|node| is_in_viewport(&ctx.document, &ctx.viewport, *node, offset));
                *pending = waiting;
                ready
            }
        };
        for node in ready {
            self.reveal(ctx, node);
        }
    }
}

impl Component for ScrollAnimator {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn init(&mut self, ctx: &mut PageContext) -> Result<(), InitError> {
        let margin = self
            .config
            .root_margin
            .parse::<RootMargin>()
            .map_err(|err| InitError::Config {
                component: "animation",
                reason: err.to_string(),
            })?;
        inject_style(&mut ctx.document, ANIMATION_STYLES_ID, ANIMATION_STYLES)?;

        let targets = select_all(&ctx.document, ctx.document.root(), &self.config.selector);
        if targets.is_empty() {
            debug!(selector = %self.config.selector, "No reveal targets");
            return Ok(());
        }

        if ctx.capabilities.prefers_reduced_motion {
            info!(count = targets.len(), "Reduced motion preferred; revealing all elements");
            for node in targets {
                self.reveal(ctx, node);
            }
            return Ok(());
        }

        self.mode = if ctx.capabilities.intersection_observer {
            let mut observer = IntersectionObserver::new(margin, self.config.threshold);
            for node in targets {
                observer.observe(node);
            }
            Mode::Observer(observer)
        } else {
            Mode::Fallback {
                pending: targets,
                throttle: Throttle::new(self.config.fallback_throttle()),
            }
        };
        self.check(ctx);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut PageContext, event: &Event) -> EventOutcome {
        if matches!(event, Event::Scroll | Event::Resize) {
            self.check(ctx);
        }
        EventOutcome::default()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use landkit_dom::{Document, Rect};

    use super::*;
    use crate::context::{Capabilities, ScrollBehavior, Viewport};

    fn page(tops: &[i64], caps: Capabilities) -> (PageContext, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let nodes = tops
            .iter()
            .map(|top| {
                let div = doc.append_element(body, "div").unwrap();
                doc.add_class(div, "animate-on-scroll").unwrap();
                doc.set_rect(div, Rect::new(0, *top, 600, 200)).unwrap();
                div
            })
            .collect();
        (
            PageContext::new(doc, Viewport::new(1280, 800)).with_capabilities(caps),
            nodes,
        )
    }

    #[test]
    fn test_observer_reveals_on_scroll_once() {
        let (mut ctx, nodes) = page(&[100, 1500], Capabilities::default());
        let mut animator = ScrollAnimator::new(AnimationConfig::default());
        animator.init(&mut ctx).unwrap();
        assert!(ctx.document.has_class(nodes[0], "visible"));
        assert!(!ctx.document.has_class(nodes[1], "visible"));
        assert!(ctx.document.element_by_id(ANIMATION_STYLES_ID).is_some());

        ctx.viewport.scroll_to(1000, ScrollBehavior::Instant);
        let _ = animator.handle_event(&mut ctx, &Event::Scroll);
        assert!(ctx.document.has_class(nodes[1], "visible"));

        ctx.viewport.scroll_to(0, ScrollBehavior::Instant);
        let _ = animator.handle_event(&mut ctx, &Event::Scroll);
        assert!(ctx.document.has_class(nodes[1], "visible"));
        assert_eq!(animator.revealed(), 2);
        assert_eq!(animator.pending(), 0);
    }

    #[test]
    fn test_bottom_margin_delays_reveal() {
        // 40px peeks into the viewport, less than the 50px bottom inset.
        let (mut ctx, nodes) = page(&[760], Capabilities::default());
        let mut animator = ScrollAnimator::new(AnimationConfig::default());
        animator.init(&mut ctx).unwrap();
        assert!(!ctx.document.has_class(nodes[0], "visible"));
    }

    #[test]
    fn test_reduced_motion_reveals_everything() {
        let mut caps = Capabilities::default();
        caps.prefers_reduced_motion = true;
        let (mut ctx, nodes) = page(&[100, 5000], caps);
        let mut animator = ScrollAnimator::new(AnimationConfig::default());
        animator.init(&mut ctx).unwrap();
        assert!(nodes.iter().all(|n| ctx.document.has_class(*n, "visible")));
    }

    #[test]
    fn test_fallback_is_throttled() {
        let mut caps = Capabilities::default();
        caps.intersection_observer = false;
        let (mut ctx, nodes) = page(&[100, 1500], caps);
        let mut animator = ScrollAnimator::new(AnimationConfig::default());
        animator.init(&mut ctx).unwrap();
        assert!(ctx.document.has_class(nodes[0], "visible"));

        // Inside the throttle window: ignored.
        ctx.viewport.scroll_to(1000, ScrollBehavior::Instant);
        let _ = animator.handle_event(&mut ctx, &Event::Scroll);
        assert!(!ctx.document.has_class(nodes[1], "visible"));

        ctx.scheduler.advance_to(Duration::from_millis(100));
        let _ = animator.handle_event(&mut ctx, &Event::Scroll);
        assert!(ctx.document.has_class(nodes[1], "visible"));
        assert_eq!(animator.pending(), 0);
    }
}
