#[cfg(test)]
mod tests {
    use std::time::Duration;

    use landkit_dom::NodeId;

    use crate::component::Component;
    use crate::config::FormConfig;
    use crate::context::PageContext;
    use crate::event::{Event, Task};
    use crate::fixture::standard_page;
    use crate::form::{
        ContactForm, ERROR_MESSAGE, FieldState, REQUIRED_MESSAGE, SUCCESS_MESSAGE, SubmitError,
    };

    fn setup() -> (PageContext, ContactForm) {
        let mut ctx = standard_page().unwrap();
        let mut form = ContactForm::new(FormConfig::default());
        form.init(&mut ctx).unwrap();
        (ctx, form)
    }

    fn field(ctx: &PageContext, name: &str) -> NodeId {
        ctx.document
            .query_selector(ctx.document.root(), &format!("#contact-form [name=\"{name}\"]"))
            .unwrap()
            .unwrap()
    }

    fn submit_button(ctx: &PageContext) -> NodeId {
        ctx.document
            .query_selector(ctx.document.root(), "#contact-form button")
            .unwrap()
            .unwrap()
    }

    fn error_nodes(ctx: &PageContext) -> usize {
        ctx.document
            .query_selector_all(ctx.document.root(), ".error-message")
            .unwrap()
            .len()
    }

    fn fill_valid(ctx: &mut PageContext) {
        for (name, value) in [
            ("name", "Jane Doe-Smith"),
            ("email", "jane@example.com"),
            ("subject", "Pricing question"),
            ("message", "Do you offer annual billing?"),
        ] {
            let node = field(ctx, name);
            ctx.document.set_value(node, value).unwrap();
        }
    }

    /// Run every timer due within `by`, like `Page::advance` does.
    fn advance(ctx: &mut PageContext, form: &mut ContactForm, by: Duration) {
        let until = ctx.scheduler.now() + by;
        while let Some((_, task)) = ctx.scheduler.pop_due(until) {
            form.run_task(ctx, &task);
        }
        ctx.scheduler.advance_to(until);
    }

    fn submit(ctx: &mut PageContext, form: &mut ContactForm) -> bool {
        let node = form.form().unwrap();
        form.handle_event(ctx, &Event::Submit { form: node })
            .default_prevented
    }

    // ---- field validation ----

    #[test]
    fn test_blur_on_empty_required_field() {
        let (mut ctx, mut form) = setup();
        let name = field(&ctx, "name");
        let _ = form.handle_event(&mut ctx, &Event::Blur { target: name });

        assert_eq!(
            form.field_state(name),
            FieldState::Invalid(REQUIRED_MESSAGE.to_owned())
        );
        assert_eq!(ctx.document.attr(name, "aria-invalid"), Some("true"));
        let group = ctx.document.parent(name).unwrap();
        assert!(ctx.document.has_class(group, "error"));
        assert_eq!(error_nodes(&ctx), 1);
    }

    #[test]
    fn test_name_scenario() {
        let (mut ctx, mut form) = setup();
        let name = field(&ctx, "name");
        ctx.document.set_value(name, "J").unwrap();
        assert!(!form.validate_field(&mut ctx, name));
        assert_eq!(
            form.field_state(name),
            FieldState::Invalid("Please enter a valid name (2-50 characters)".to_owned())
        );

        ctx.document.set_value(name, "Jane Doe-Smith").unwrap();
        assert!(form.validate_field(&mut ctx, name));
        assert_eq!(form.field_state(name), FieldState::Valid);
        assert_eq!(error_nodes(&ctx), 0);
        assert_eq!(ctx.document.attr(name, "aria-invalid"), Some("false"));
    }

    #[test]
    fn test_optional_field_accepts_empty_but_not_garbage() {
        let (mut ctx, mut form) = setup();
        let phone = field(&ctx, "phone");
        assert!(form.validate_field(&mut ctx, phone));
        ctx.document.set_value(phone, "12345").unwrap();
        assert!(!form.validate_field(&mut ctx, phone));
    }

    #[test]
    fn test_repeated_invalid_submissions_do_not_stack_errors() {
        let (mut ctx, mut form) = setup();
        for _ in 0..3 {
            assert!(submit(&mut ctx, &mut form));
        }
        assert_eq!(error_nodes(&ctx), 4);
        let name = field(&ctx, "name");
        let group = ctx.document.parent(name).unwrap();
        assert_eq!(
            ctx.document
                .query_selector_all(group, ".error-message")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_revalidating_invalid_field_reuses_error_slot() {
        let (mut ctx, mut form) = setup();
        let name = field(&ctx, "name");
        let group = ctx.document.parent(name).unwrap();
        ctx.document.set_value(name, "J").unwrap();
        assert!(!form.validate_field(&mut ctx, name));
        let slot = ctx
            .document
            .query_selector(group, ".error-message")
            .unwrap()
            .unwrap();
        let next_index = ctx.document.create_text("").index();

        for _ in 0..1000 {
            assert!(!form.validate_field(&mut ctx, name));
        }
        assert_eq!(
            ctx.document.query_selector_all(group, ".error-message").unwrap(),
            vec![slot]
        );
        assert_eq!(ctx.document.create_text("").index(), next_index + 1);

        form.clear_field(&mut ctx, name);
        assert_eq!(error_nodes(&ctx), 0);
        assert_eq!(ctx.document.attr(name, "aria-describedby"), None);
    }

    // ---- debounce ----

    #[test]
    fn test_input_validates_after_quiet_period() {
        let (mut ctx, mut form) = setup();
        let email = field(&ctx, "email");
        ctx.document.set_value(email, "not-an-email").unwrap();
        let _ = form.handle_event(&mut ctx, &Event::Input { target: email });

        advance(&mut ctx, &mut form, Duration::from_millis(200));
        assert_eq!(form.field_state(email), FieldState::Unvalidated);

        // Typing again restarts the quiet period.
        let _ = form.handle_event(&mut ctx, &Event::Input { target: email });
        advance(&mut ctx, &mut form, Duration::from_millis(200));
        assert_eq!(form.field_state(email), FieldState::Unvalidated);

        advance(&mut ctx, &mut form, Duration::from_millis(100));
        assert_eq!(
            form.field_state(email),
            FieldState::Invalid("Please enter a valid email address".to_owned())
        );
    }

    #[test]
    fn test_fields_debounce_independently() {
        let (mut ctx, mut form) = setup();
        let name = field(&ctx, "name");
        let subject = field(&ctx, "subject");
        let _ = form.handle_event(&mut ctx, &Event::Input { target: name });
        advance(&mut ctx, &mut form, Duration::from_millis(150));
        let _ = form.handle_event(&mut ctx, &Event::Input { target: subject });
        assert_eq!(ctx.scheduler.pending(), 2);

        advance(&mut ctx, &mut form, Duration::from_millis(150));
        assert!(form.field_state(name).is_invalid());
        assert_eq!(form.field_state(subject), FieldState::Unvalidated);
    }

    // ---- submission ----

    #[test]
    fn test_invalid_submit_focuses_first_invalid_field() {
        let (mut ctx, mut form) = setup();
        fill_valid(&mut ctx);
        let email = field(&ctx, "email");
        ctx.document.set_value(email, "nope").unwrap();

        assert!(submit(&mut ctx, &mut form));
        assert_eq!(ctx.pending_submissions(), 0);
        assert_eq!(ctx.document.focused(), Some(email));
        assert!(form.in_flight().is_empty());
        assert!(!ctx.document.has_attr(submit_button(&ctx), "disabled"));
    }

    #[test]
    fn test_valid_submit_enters_loading_state() {
        let (mut ctx, mut form) = setup();
        fill_valid(&mut ctx);
        assert!(submit(&mut ctx, &mut form));

        let button = submit_button(&ctx);
        assert!(ctx.document.has_attr(button, "disabled"));
        assert!(ctx.document.has_class(button, "loading"));
        assert_eq!(ctx.document.text_content(button), "Sending...");

        let pending = ctx.take_submissions();
        assert_eq!(pending.len(), 1);
        let data = &pending[0].data;
        assert_eq!(data.get("name"), Some("Jane Doe-Smith"));
        assert_eq!(data.get("phone"), Some(""));
        assert_eq!(data.len(), 5);
        assert_eq!(form.in_flight(), &[pending[0].id]);
    }

    #[test]
    fn test_success_resets_form_and_restores_control() {
        let (mut ctx, mut form) = setup();
        fill_valid(&mut ctx);
        assert!(submit(&mut ctx, &mut form));
        let id = ctx.take_submissions()[0].id;

        form.run_task(&mut ctx, &Task::SubmissionSettled { id, result: Ok(()) });

        let banner = form.banner().unwrap();
        assert!(ctx.document.has_class(banner, "success"));
        assert!(ctx.document.text_content(banner).contains(SUCCESS_MESSAGE));
        for name in ["name", "email", "subject", "message"] {
            let node = field(&ctx, name);
            assert_eq!(ctx.document.value(node).unwrap(), "");
            assert_eq!(form.field_state(node), FieldState::Unvalidated);
            assert_eq!(ctx.document.attr(node, "aria-invalid"), None);
        }
        let group = ctx.document.parent(field(&ctx, "name")).unwrap();
        assert!(!ctx.document.has_class(group, "success"));

        let button = submit_button(&ctx);
        assert!(!ctx.document.has_attr(button, "disabled"));
        assert!(!ctx.document.has_class(button, "loading"));
        assert_eq!(ctx.document.text_content(button), "Send Message");
        assert!(form.in_flight().is_empty());
    }

    #[test]
    fn test_failure_keeps_values_and_shows_error() {
        let (mut ctx, mut form) = setup();
        fill_valid(&mut ctx);
        assert!(submit(&mut ctx, &mut form));
        let id = ctx.take_submissions()[0].id;

        form.run_task(
            &mut ctx,
            &Task::SubmissionSettled {
                id,
                result: Err(SubmitError::Rejected("spam".to_owned())),
            },
        );

        let banner = form.banner().unwrap();
        assert!(ctx.document.has_class(banner, "error"));
        assert!(ctx.document.text_content(banner).contains(ERROR_MESSAGE));
        let name = field(&ctx, "name");
        assert_eq!(ctx.document.value(name).unwrap(), "Jane Doe-Smith");
        assert_eq!(form.field_state(name), FieldState::Valid);
        assert_eq!(ctx.document.text_content(submit_button(&ctx)), "Send Message");
    }

    #[test]
    fn test_unknown_submission_is_ignored() {
        let (mut ctx, mut form) = setup();
        fill_valid(&mut ctx);
        assert!(submit(&mut ctx, &mut form));
        let id = ctx.take_submissions()[0].id;
        let other = ctx.enqueue_submission(form.form().unwrap(), crate::form::FormData::new());
        assert_ne!(id, other);

        form.run_task(&mut ctx, &Task::SubmissionSettled { id: other, result: Ok(()) });
        assert_eq!(form.banner(), None);
        assert!(ctx.document.has_attr(submit_button(&ctx), "disabled"));
    }

    // ---- banner ----

    #[test]
    fn test_banner_auto_dismisses_and_is_replaced() {
        let (mut ctx, mut form) = setup();
        for _ in 0..2 {
            fill_valid(&mut ctx);
            assert!(submit(&mut ctx, &mut form));
            let id = ctx.take_submissions()[0].id;
            form.run_task(&mut ctx, &Task::SubmissionSettled { id, result: Ok(()) });
        }
        let banners = ctx
            .document
            .query_selector_all(ctx.document.root(), ".form-message")
            .unwrap();
        assert_eq!(banners.len(), 1);

        advance(&mut ctx, &mut form, Duration::from_millis(4999));
        assert!(form.banner().is_some());
        advance(&mut ctx, &mut form, Duration::from_millis(1));
        assert_eq!(form.banner(), None);
        assert!(!ctx.document.is_connected(banners[0]));
    }

    #[test]
    fn test_close_button_dismisses_banner() {
        let (mut ctx, mut form) = setup();
        fill_valid(&mut ctx);
        assert!(submit(&mut ctx, &mut form));
        let id = ctx.take_submissions()[0].id;
        form.run_task(&mut ctx, &Task::SubmissionSettled { id, result: Ok(()) });

        let banner = form.banner().unwrap();
        let close = ctx
            .document
            .query_selector(banner, ".form-message__close")
            .unwrap()
            .unwrap();
        let _ = form.handle_event(&mut ctx, &Event::Click { target: close });
        assert_eq!(form.banner(), None);
        assert!(!ctx.document.is_connected(banner));
        assert_eq!(ctx.scheduler.pending(), 0);
    }

    // ---- scope ----

    #[test]
    fn test_other_forms_are_left_alone() {
        let (mut ctx, mut form) = setup();
        let body = ctx.document.body();
        let search = ctx.document.append_element(body, "form").unwrap();
        let query = ctx.document.append_element(search, "input").unwrap();
        ctx.document.set_attr(query, "name", "q").unwrap();
        ctx.document.set_attr(query, "required", "").unwrap();

        let outcome = form.handle_event(&mut ctx, &Event::Submit { form: search });
        assert!(!outcome.default_prevented);
        let _ = form.handle_event(&mut ctx, &Event::Blur { target: query });
        assert_eq!(form.field_state(query), FieldState::Unvalidated);
    }

    #[test]
    fn test_missing_form_is_inert() {
        let mut ctx = standard_page().unwrap();
        let mut cfg = FormConfig::default();
        cfg.form_selector = "#newsletter".to_owned();
        let mut form = ContactForm::new(cfg);
        form.init(&mut ctx).unwrap();
        assert_eq!(form.form(), None);
    }
}
