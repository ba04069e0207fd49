//! Collapsible mobile navigation menu.

use landkit_dom::{DomError, NodeId};
use tracing::{debug, warn};

use crate::component::Component;
use crate::config::NavigationConfig;
use crate::context::PageContext;
use crate::error::InitError;
use crate::event::{Event, EventOutcome, Key, Task};
use crate::styles::{NAV_STYLES, NAV_STYLES_ID, inject_style};
use crate::util::{Debouncer, closest, select};

const TOGGLE_SELECTOR: &str = "button.nav-toggle";
const DEFAULT_MENU_ID: &str = "primary-menu";
const TOGGLE_LABEL: &str = "Toggle navigation menu";

#[derive(Debug, Clone, Copy)]
struct NavAnchors {
    nav: NodeId,
    menu: Option<NodeId>,
    toggle: NodeId,
}

/// Hamburger toggle for the header navigation.
///
/// Below the breakpoint the menu is hidden until the toggle opens it.
/// Clicking a menu link, clicking outside, or pressing Escape closes it.
#[derive(Debug)]
pub struct Navigation {
    config: NavigationConfig,
    anchors: Option<NavAnchors>,
    open: bool,
    resize: Debouncer,
}

impl Navigation {
    #[must_use]
    pub fn new(config: NavigationConfig) -> Self {
        let resize = Debouncer::new(config.resize_debounce());
        Self {
            config,
            anchors: None,
            open: false,
            resize,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether init found its anchors.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.anchors.is_some()
    }

    /// The toggle button, once initialized.
    #[must_use]
    pub fn toggle_button(&self) -> Option<NodeId> {
        self.anchors.map(|a| a.toggle)
    }

    fn is_mobile(&self, ctx: &PageContext) -> bool {
        ctx.viewport.width() < self.config.breakpoint_px
    }

    fn ensure_toggle(
        ctx: &mut PageContext,
        header: NodeId,
        nav: NodeId,
    ) -> Result<NodeId, DomError> {
        let doc = &mut ctx.document;
        if let Some(existing) = select(doc, header, TOGGLE_SELECTOR) {
            return Ok(existing);
        }
        let toggle = doc.create_element("button");
        let parent = doc.parent_element(nav).unwrap_or(header);
        doc.insert_before(parent, toggle, Some(nav))?;
        doc.add_class(toggle, "nav-toggle")?;
        doc.set_attr(toggle, "type", "button")?;
        doc.set_attr(toggle, "aria-label", TOGGLE_LABEL)?;
        for _ in 0..3 {
            let bar = doc.append_element(toggle, "span")?;
            doc.add_class(bar, "nav-toggle-bar")?;
        }
        Ok(toggle)
    }

    /// `aria-hidden` mirrors the open flag on mobile and is absent on desktop.
    fn sync_menu_visibility(&self, ctx: &mut PageContext, anchors: NavAnchors) -> Result<(), DomError> {
        let Some(menu) = anchors.menu else {
            return Ok(());
        };
        if self.is_mobile(ctx) {
            let hidden = if self.open { "false" } else { "true" };
            ctx.document.set_attr(menu, "aria-hidden", hidden)
        } else {
            ctx.document.remove_attr(menu, "aria-hidden").map(|_| ())
        }
    }

    fn open_menu(&mut self, ctx: &mut PageContext, anchors: NavAnchors) -> Result<(), DomError> {
        self.open = true;
        let doc = &mut ctx.document;
        doc.add_class(anchors.nav, &self.config.open_class)?;
        doc.set_attr(anchors.toggle, "aria-expanded", "true")?;
        if let Some(menu) = anchors.menu {
            doc.set_attr(menu, "aria-hidden", "false")?;
        }
        let scope = anchors.menu.unwrap_or(anchors.nav);
        if let Some(first_link) = select(doc, scope, &self.config.link_selector) {
            doc.focus(first_link)?;
        }
        debug!("Navigation menu opened");
        Ok(())
    }

    fn close_menu(
        &mut self,
        ctx: &mut PageContext,
        anchors: NavAnchors,
        restore_focus: bool,
    ) -> Result<(), DomError> {
        self.open = false;
        ctx.document.remove_class(anchors.nav, &self.config.open_class)?;
        ctx.document
            .set_attr(anchors.toggle, "aria-expanded", "false")?;
        self.sync_menu_visibility(ctx, anchors)?;
        if restore_focus {
            ctx.document.focus(anchors.toggle)?;
        }
        debug!("Navigation menu closed");
        Ok(())
    }

    fn on_click(
        &mut self,
        ctx: &mut PageContext,
        anchors: NavAnchors,
        target: NodeId,
    ) -> Result<(), DomError> {
        let doc = &ctx.document;
        if doc.contains(anchors.toggle, target) {
            return if self.open {
                self.close_menu(ctx, anchors, false)
            } else {
                self.open_menu(ctx, anchors)
            };
        }
        if !self.open {
            return Ok(());
        }
        let inside_nav = doc.contains(anchors.nav, target);
        let on_link = inside_nav
            && closest(doc, target, &self.config.link_selector)
                .is_some_and(|link| doc.contains(anchors.nav, link));
        if on_link || !inside_nav {
            self.close_menu(ctx, anchors, false)?;
        }
        Ok(())
    }
}

impl Component for Navigation {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn init(&mut self, ctx: &mut PageContext) -> Result<(), InitError> {
        let root = ctx.document.root();
        let Some(header) = select(&ctx.document, root, &self.config.header_selector) else {
            warn!(selector = %self.config.header_selector, "Header not found; navigation disabled");
            return Ok(());
        };
        let Some(nav) = select(&ctx.document, header, &self.config.nav_selector) else {
            warn!(selector = %self.config.nav_selector, "Navigation not found; navigation disabled");
            return Ok(());
        };

        inject_style(&mut ctx.document, NAV_STYLES_ID, NAV_STYLES)?;

        let menu = select(&ctx.document, nav, &self.config.menu_selector);
        let toggle = Self::ensure_toggle(ctx, header, nav)?;
        let doc = &mut ctx.document;
        doc.set_attr(toggle, "aria-expanded", "false")?;
        if let Some(menu) = menu {
            if doc.id(menu).is_none() {
                doc.set_attr(menu, "id", DEFAULT_MENU_ID)?;
            }
            let menu_id = doc.id(menu).unwrap_or(DEFAULT_MENU_ID).to_owned();
            doc.set_attr(toggle, "aria-controls", &menu_id)?;
        }

        let anchors = NavAnchors { nav, menu, toggle };
        self.open = false;
        self.sync_menu_visibility(ctx, anchors)?;
        self.anchors = Some(anchors);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut PageContext, event: &Event) -> EventOutcome {
        let Some(anchors) = self.anchors else {
            return EventOutcome::default();
        };
        let result = match event {
            Event::Click { target } => self.on_click(ctx, anchors, *target),
            Event::KeyDown { key: Key::Escape } if self.open => {
                self.close_menu(ctx, anchors, true)
            }
            Event::Resize => {
                self.resize.call(&mut ctx.scheduler, Task::NavResizeSettled);
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!(error = %err, "Navigation update failed");
        }
        EventOutcome::default()
    }

    fn run_task(&mut self, ctx: &mut PageContext, task: &Task) {
        let (Task::NavResizeSettled, Some(anchors)) = (task, self.anchors) else {
            return;
        };
        self.resize.settle();
        let result = if self.open && !self.is_mobile(ctx) {
            self.close_menu(ctx, anchors, false)
        } else {
            self.sync_menu_visibility(ctx, anchors)
        };
        if let Err(err) = result {
            warn!(error = %err, "Navigation resize handling failed");
        }
    }
}
