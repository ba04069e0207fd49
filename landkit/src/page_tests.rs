#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::component::Component;
    use crate::config::{BootPolicy, LandingConfig};
    use crate::context::{PageContext, ReadyState, ScrollBehavior};
    use crate::error::InitError;
    use crate::event::{Event, Task};
    use crate::fixture::standard_page;
    use crate::navigation::Navigation;
    use crate::page::Page;

    fn boot(config: &LandingConfig) -> Page {
        let mut page = Page::new(standard_page().unwrap(), config);
        page.boot();
        page
    }

    fn broken_lazy_load(policy: BootPolicy) -> LandingConfig {
        let mut config = LandingConfig::default();
        config.lazy_load.root_margin = "bogus".to_owned();
        config.boot_policy = policy;
        config
    }

    /// Records the order in which it sees tasks.
    struct TaskLog {
        seen: std::rc::Rc<std::cell::RefCell<Vec<Task>>>,
    }

    impl Component for TaskLog {
        fn name(&self) -> &'static str {
            "task_log"
        }

        fn init(&mut self, _ctx: &mut PageContext) -> Result<(), InitError> {
            Ok(())
        }

        fn run_task(&mut self, _ctx: &mut PageContext, task: &Task) {
            self.seen.borrow_mut().push(task.clone());
        }
    }

    // ---- boot ----

    #[test]
    fn test_boot_runs_components_in_order() {
        let page = boot(&LandingConfig::default());
        let report = page.boot_report().unwrap();
        assert!(report.is_clean());
        assert_eq!(
            report.initialized,
            vec!["navigation", "smooth_scroll", "lazy_load", "form", "animation"]
        );
    }

    #[test]
    fn test_boot_is_deferred_while_loading() {
        let ctx = standard_page().unwrap().with_ready_state(ReadyState::Loading);
        let mut page = Page::new(ctx, &LandingConfig::default());
        page.boot();
        assert!(page.boot_report().is_none());
        assert!(page.context().document.element_by_id("nav-styles").is_none());

        let _ = page.dispatch(&Event::DomContentLoaded);
        assert_eq!(page.context().ready_state(), ReadyState::Interactive);
        assert_eq!(page.boot_report().unwrap().initialized.len(), 5);
        assert!(page.context().document.element_by_id("nav-styles").is_some());

        // A second DOMContentLoaded does not re-run init.
        let _ = page.dispatch(&Event::DomContentLoaded);
        page.boot();
        let toggles = page
            .context()
            .document
            .query_selector_all(page.context().document.root(), ".nav-toggle")
            .unwrap();
        assert_eq!(toggles.len(), 1);
    }

    #[test]
    fn test_stop_on_error_skips_later_components() {
        let page = boot(&broken_lazy_load(BootPolicy::StopOnError));
        let report = page.boot_report().unwrap();
        assert_eq!(report.initialized, vec!["navigation", "smooth_scroll"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].component, "lazy_load");
        assert!(report.failed[0].error.contains("bogus"), "got: {}", report.failed[0].error);
        assert_eq!(report.skipped, vec!["form", "animation"]);

        // Markup rendered before the failure stays usable.
        assert!(page.context().document.element_by_id("nav-styles").is_some());
        assert!(page.context().document.element_by_id("animation-styles").is_none());
    }

    #[test]
    fn test_isolate_continues_past_failure() {
        let page = boot(&broken_lazy_load(BootPolicy::Isolate));
        let report = page.boot_report().unwrap();
        assert_eq!(
            report.initialized,
            vec!["navigation", "smooth_scroll", "form", "animation"]
        );
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_failed_component_receives_no_events() {
        let mut page = boot(&broken_lazy_load(BootPolicy::Isolate));
        let _ = page.scroll_to(2000);
        let pricing_img = page
            .context()
            .document
            .query_selector(page.context().document.root(), "img[data-src=\"/images/pricing.webp\"]")
            .unwrap();
        assert!(pricing_img.is_some());
    }

    // ---- default actions ----

    #[test]
    fn test_submit_click_is_handled_by_form() {
        let mut page = boot(&LandingConfig::default());
        let outcome = page.click("#contact-form button[type=\"submit\"]").unwrap();
        assert!(!outcome.default_prevented);
        assert_eq!(page.context().native_submissions(), 0);
        assert_eq!(page.context().pending_submissions(), 0);
        let focused = page.context().document.focused().unwrap();
        assert_eq!(page.context().document.id(focused), Some("contact-name"));
    }

    #[test]
    fn test_unhandled_submit_counts_as_native() {
        let components: Vec<Box<dyn Component>> =
            vec![Box::new(Navigation::new(LandingConfig::default().navigation))];
        let mut page = Page::with_components(standard_page().unwrap(), components, BootPolicy::default());
        page.boot();
        let _ = page.click("#contact-form button").unwrap();
        assert_eq!(page.context().native_submissions(), 1);
    }

    #[test]
    fn test_anchor_click_scrolls_and_triggers_scroll_handlers() {
        let mut page = boot(&LandingConfig::default());
        let outcome = page.click("a[href=\"#pricing\"]").unwrap();
        assert!(outcome.default_prevented);

        let ctx = page.context();
        assert_eq!(ctx.viewport.scroll_y(), 1620);
        assert_eq!(ctx.location.hash(), "pricing");
        let card = ctx
            .document
            .query_selector(ctx.document.root(), "#pricing .animate-on-scroll")
            .unwrap()
            .unwrap();
        assert!(ctx.document.has_class(card, "visible"));
        let img = ctx
            .document
            .query_selector(ctx.document.root(), "#pricing img")
            .unwrap()
            .unwrap();
        assert_eq!(ctx.document.attr(img, "src"), Some("/images/pricing.webp"));
    }

    #[test]
    fn test_native_anchor_jump_without_smooth_scroll() {
        let components: Vec<Box<dyn Component>> = Vec::new();
        let mut page = Page::with_components(standard_page().unwrap(), components, BootPolicy::default());
        page.boot();
        let _ = page.click("a[href=\"#contact\"]").unwrap();
        let ctx = page.context();
        assert_eq!(ctx.viewport.scroll_y(), 2500);
        assert_eq!(
            ctx.viewport.scroll_history().last().map(|r| r.behavior),
            Some(ScrollBehavior::Instant)
        );
        assert_eq!(ctx.location.hash(), "contact");
    }

    #[test]
    fn test_disabled_control_swallows_click() {
        let mut page = boot(&LandingConfig::default());
        let root = page.context().document.root();
        let button = page
            .context()
            .document
            .query_selector(root, "#contact-form button")
            .unwrap()
            .unwrap();
        page.context_mut()
            .document
            .set_attr(button, "disabled", "")
            .unwrap();
        let _ = page.click_node(button).unwrap();
        assert_eq!(page.context().document.focused(), None);
        assert_eq!(page.context().native_submissions(), 0);
        assert!(
            page.context()
                .document
                .query_selector(root, ".error-message")
                .unwrap()
                .is_none()
        );
    }

    // ---- helpers ----

    #[test]
    fn test_unknown_selector_is_no_match() {
        let mut page = boot(&LandingConfig::default());
        let err = page.click("#missing").unwrap_err();
        assert!(err.to_string().contains("#missing"), "got: {err}");
        assert!(page.type_text("#missing", "x").is_err());
        assert!(page.submit("form#nope").is_err());
    }

    #[test]
    fn test_type_then_move_focus_blurs_previous_field() {
        let mut page = boot(&LandingConfig::default());
        let _ = page.type_text("#contact-name", "J").unwrap();
        page.focus("#contact-email").unwrap();
        let root = page.context().document.root();
        let error = page
            .context()
            .document
            .query_selector(root, "#contact-name-error")
            .unwrap()
            .unwrap();
        assert_eq!(
            page.context().document.text_content(error),
            "Please enter a valid name (2-50 characters)"
        );
    }

    #[test]
    fn test_advance_runs_timers_in_deadline_order() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let components: Vec<Box<dyn Component>> = vec![Box::new(TaskLog { seen: seen.clone() })];
        let mut page = Page::with_components(standard_page().unwrap(), components, BootPolicy::default());
        page.boot();
        let body = page.context().document.body();
        let scheduler = &mut page.context_mut().scheduler;
        scheduler.schedule(Duration::from_millis(300), Task::DismissMessage(body));
        scheduler.schedule(Duration::from_millis(100), Task::NavResizeSettled);
        scheduler.schedule(Duration::from_millis(900), Task::NavResizeSettled);

        page.advance(Duration::from_millis(500));
        assert_eq!(
            *seen.borrow(),
            vec![Task::NavResizeSettled, Task::DismissMessage(body)]
        );
        assert_eq!(page.context().scheduler.now(), Duration::from_millis(500));
        assert_eq!(page.context().scheduler.pending(), 1);
    }
}
