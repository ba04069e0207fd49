//! Deferred image loading.

use landkit_dom::{DomError, NodeId};
use tracing::{debug, info, warn};

use crate::component::Component;
use crate::config::LazyLoadConfig;
use crate::context::PageContext;
use crate::error::InitError;
use crate::event::{Event, EventOutcome};
use crate::util::{IntersectionObserver, RootMargin, select_all};

/// Swaps `data-src`/`data-srcset` into place once an image nears the
/// viewport. Without intersection support every image loads at init.
#[derive(Debug)]
pub struct LazyLoader {
    config: LazyLoadConfig,
    observer: Option<IntersectionObserver>,
    loaded: usize,
}

impl LazyLoader {
    #[must_use]
    pub const fn new(config: LazyLoadConfig) -> Self {
        Self {
            config,
            observer: None,
            loaded: 0,
        }
    }

    /// Images still waiting for their real source.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.observer.as_ref().map_or(0, IntersectionObserver::len)
    }

    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    fn load(&mut self, ctx: &mut PageContext, image: NodeId) -> Result<(), DomError> {
        let doc = &mut ctx.document;
        if let Some(src) = doc.attr(image, "data-src").map(str::to_owned) {
            doc.set_attr(image, "src", &src)?;
            doc.remove_attr(image, "data-src")?;
        }
        if let Some(srcset) = doc.attr(image, "data-srcset").map(str::to_owned) {
            doc.set_attr(image, "srcset", &srcset)?;
            doc.remove_attr(image, "data-srcset")?;
        }
        doc.add_class(image, &self.config.loaded_class)?;
        doc.remove_class(image, "lazy")?;
        self.loaded += 1;
        debug!(image = %image, "Loaded lazy image");
        Ok(())
    }

    fn process_records(&mut self, ctx: &mut PageContext) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        let ready: Vec<NodeId> = observer
            .take_records(&ctx.document, &ctx.viewport)
            .into_iter()
            .filter(|entry| entry.is_intersecting)
            .map(|entry| entry.target)
            .collect();
        for image in ready {
            if let Some(observer) = self.observer.as_mut() {
                observer.unobserve(image);
            }
            if let Err(err) = self.load(ctx, image) {
                warn!(image = %image, error = %err, "Failed to load lazy image");
            }
        }
    }
}

impl Component for LazyLoader {
    fn name(&self) -> &'static str {
        "lazy_load"
    }

    fn init(&mut self, ctx: &mut PageContext) -> Result<(), InitError> {
        let margin = self
            .config
            .root_margin
            .parse::<RootMargin>()
            .map_err(|err| InitError::Config {
                component: "lazy_load",
                reason: err.to_string(),
            })?;

        let images = select_all(&ctx.document, ctx.document.root(), &self.config.image_selector);
        if !ctx.capabilities.intersection_observer {
            info!(count = images.len(), "Intersection observation unavailable; loading all images");
            for image in images {
                self.load(ctx, image)?;
            }
            return Ok(());
        }

        let mut observer = IntersectionObserver::new(margin, self.config.threshold);
        for image in images {
            observer.observe(image);
        }
        self.observer = Some(observer);
        self.process_records(ctx);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut PageContext, event: &Event) -> EventOutcome {
        if matches!(event, Event::Scroll | Event::Resize) {
            self.process_records(ctx);
        }
        EventOutcome::default()
    }
}
