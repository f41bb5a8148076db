//! Integration tests for the enrollment form: submit-time validation,
//! the confirmation overlay and real-time field feedback.

mod common;

use common::Page;
use omrc_ui::validation::FieldRule;
use omrc_ui::{Check, Dom, ScrollAlign, Site, SiteConfig, SubmissionState};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn mounted() -> (Page, Site<omrc_ui::MemoryDom>) {
    let page = Page::new();
    let site = Site::mount(page.dom.clone(), &SiteConfig::default());
    (page, site)
}

#[test]
fn test_valid_form_shows_confirmation() {
    let (page, site) = mounted();
    page.fill_valid();

    let event = page.dom.submit(page.form);
    assert!(event.default_prevented());

    let flow = site.submission().expect("form mounted");
    let report = flow.last_report().expect("report recorded");
    assert!(report.is_valid());
    assert_eq!(report.failures, vec![]);
    assert_eq!(flow.state(), SubmissionState::Submitted);

    let (backdrop, panel) = flow.overlay().expect("overlay shown");
    assert!(page.dom.is_attached(backdrop));
    assert_eq!(page.dom.parent(&backdrop), Some(page.dom.body_node()));
    assert_eq!(page.dom.style(&backdrop, "position"), "fixed");

    let heading = page.dom.query_first(Some(&panel), "h2").unwrap().unwrap();
    assert_eq!(page.dom.text(heading), "Application Submitted!");
    assert_eq!(page.dom.query_all(Some(&panel), "p").unwrap().len(), 2);
    assert!(page.dom.alerts().is_empty());
}

#[test]
fn test_missing_declaration_blocks_submission() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.set_checked(page.declaration, false);

    assert!(page.dom.submit(page.form).default_prevented());

    let flow = site.submission().unwrap();
    let report = flow.last_report().unwrap();
    assert!(!report.is_valid());
    assert!(report.has_failure(Check::Declaration));
    assert_eq!(flow.state(), SubmissionState::Idle);
    assert!(flow.overlay().is_none());

    let label = page.label_of(page.declaration);
    assert!(page.is_marked(label));
    assert_eq!(
        page.message_for(label).as_deref(),
        Some("You must accept the declaration to proceed")
    );
    assert_eq!(page.dom.effects().scrolls, vec![(label, ScrollAlign::Center)]);
}

#[test]
fn test_checking_declaration_clears_its_error() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.set_checked(page.declaration, false);
    page.dom.submit(page.form);
    let label = page.label_of(page.declaration);
    assert!(page.is_marked(label));

    page.dom.click(page.declaration);
    page.dom.submit(page.form);
    assert!(!page.is_marked(label));
    assert_eq!(page.message_for(label), None);
    assert_eq!(site.submission().unwrap().state(), SubmissionState::Submitted);
}

#[test]
fn test_empty_required_fields_are_marked_without_message() {
    let (page, site) = mounted();
    page.dom.submit(page.form);

    let report = site.submission().unwrap().last_report().unwrap();
    let required: Vec<_> = report
        .failures
        .iter()
        .filter(|f| f.check == Check::Required)
        .map(|f| f.field.clone().unwrap_or_default())
        .collect();
    assert_eq!(required, vec!["firstName", "email", "phone", "program"]);

    for field in [page.first_name, page.email, page.phone, page.program] {
        assert!(page.is_marked(field));
        assert_eq!(page.message_for(field), None);
    }
    assert!(!page.is_marked(page.id_number));
    assert!(!page.is_marked(page.notes));

    // First marked element in document order gets centred
    assert_eq!(
        page.dom.effects().scrolls,
        vec![(page.first_name, ScrollAlign::Center)]
    );
}

#[test]
fn test_whitespace_only_required_values_count_as_empty() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.set_value(page.first_name, "   ");
    page.dom.set_value(page.program, "\u{FEFF} ");
    page.dom.set_value(page.email, "   ");
    page.dom.submit(page.form);

    let report = site.submission().unwrap().last_report().unwrap();
    assert!(!report.is_valid());
    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|f| (f.check, f.field.clone().unwrap_or_default()))
        .collect();
    assert_eq!(
        failures,
        vec![
            (Check::Required, "firstName".to_string()),
            (Check::Required, "email".to_string()),
            (Check::Required, "program".to_string()),
            (Check::Format(FieldRule::Email), "email".to_string()),
        ]
    );

    assert!(page.is_marked(page.first_name));
    assert_eq!(page.message_for(page.first_name), None);
    assert!(page.is_marked(page.program));

    // The format check runs after the required check and writes last
    assert!(page.is_marked(page.email));
    assert_eq!(
        page.message_for(page.email).as_deref(),
        Some("Please enter a valid email address")
    );
    assert_eq!(site.submission().unwrap().state(), SubmissionState::Idle);
}

#[test]
fn test_no_financing_option_raises_alert() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.set_checked(page.financing[1], false);

    page.dom.submit(page.form);

    let report = site.submission().unwrap().last_report().unwrap();
    assert!(!report.is_valid());
    assert!(report.has_failure(Check::Financing));
    assert_eq!(
        page.dom.alerts(),
        vec!["Please select at least one financing option".to_string()]
    );
    // No field is marked, so there is nothing to scroll to
    assert!(page.dom.effects().scrolls.is_empty());
}

#[test]
fn test_invalid_email_and_phone_get_messages() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.set_value(page.email, "no-at-sign.com");
    page.dom.set_value(page.phone, "12345");

    page.dom.submit(page.form);

    let report = site.submission().unwrap().last_report().unwrap();
    assert!(report.has_failure(Check::Format(FieldRule::Email)));
    assert!(report.has_failure(Check::Format(FieldRule::Phone)));
    assert_eq!(
        page.message_for(page.email).as_deref(),
        Some("Please enter a valid email address")
    );
    assert_eq!(
        page.message_for(page.phone).as_deref(),
        Some("Please enter a valid South African phone number")
    );

    page.dom.set_value(page.email, "thandi@example.co.za");
    page.dom.set_value(page.phone, "0821234567");
    page.dom.submit(page.form);
    assert!(!page.is_marked(page.email));
    assert!(!page.is_marked(page.phone));
    assert_eq!(page.message_for(page.email), None);
    assert_eq!(site.submission().unwrap().state(), SubmissionState::Submitted);
}

#[test]
fn test_invalid_id_number_does_not_block_submission() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.set_value(page.id_number, "AB1");

    page.dom.submit(page.form);

    let flow = site.submission().unwrap();
    let report = flow.last_report().unwrap();
    assert!(report.is_valid());
    assert_eq!(report.advisories().count(), 1);
    assert!(report.has_failure(Check::Format(FieldRule::Identity)));

    // Highlighted, yet the confirmation still appears
    assert!(page.is_marked(page.id_number));
    assert_eq!(
        page.message_for(page.id_number).as_deref(),
        Some("Please enter a valid ID or Passport number")
    );
    assert_eq!(flow.state(), SubmissionState::Submitted);
    assert!(page.dom.effects().scrolls.is_empty());
}

#[test]
fn test_backdrop_click_closes_and_resets() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.submit(page.form);

    let flow = site.submission().unwrap();
    let (backdrop, _panel) = flow.overlay().unwrap();
    page.dom.click(backdrop);

    assert!(flow.overlay().is_none());
    assert!(!page.dom.is_attached(backdrop));
    assert_eq!(flow.state(), SubmissionState::Idle);

    for field in [page.first_name, page.email, page.phone, page.id_number, page.program] {
        assert_eq!(page.dom.value(&field), "");
    }
    assert!(!page.dom.is_checked(&page.declaration));
    assert!(page.financing.iter().all(|cb| !page.dom.is_checked(cb)));
}

#[test]
fn test_clicks_inside_panel_keep_overlay() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.submit(page.form);

    let flow = site.submission().unwrap();
    let (backdrop, panel) = flow.overlay().unwrap();
    let heading = page.dom.query_first(Some(&panel), "h2").unwrap().unwrap();

    page.dom.click(panel);
    page.dom.click(heading);
    assert!(page.dom.is_attached(backdrop));
    assert_eq!(flow.state(), SubmissionState::Submitted);
    assert_eq!(page.dom.value(&page.email), "thandi@example.co.za");

    let button = page.dom.query_first(Some(&panel), "button").unwrap().unwrap();
    assert_eq!(page.dom.text(button), "Return to Homepage");
    page.dom.click(button);
    assert_eq!(page.dom.effects().navigations, vec!["index.html".to_string()]);
    assert!(page.dom.is_attached(backdrop));
}

#[test]
fn test_resubmitting_while_confirmed_is_ignored() {
    let (page, site) = mounted();
    page.fill_valid();
    page.dom.submit(page.form);
    let listeners = page.dom.listener_count();

    assert!(page.dom.submit(page.form).default_prevented());

    let body = page.dom.body_node();
    let overlays: Vec<_> = page
        .dom
        .children(body)
        .into_iter()
        .filter(|n| page.dom.style(n, "position") == "fixed")
        .collect();
    assert_eq!(overlays.len(), 1);
    assert_eq!(page.dom.listener_count(), listeners);
    assert_eq!(site.submission().unwrap().state(), SubmissionState::Submitted);
}

#[test]
fn test_overlay_listeners_released_on_close() {
    let (page, site) = mounted();
    let before = page.dom.listener_count();
    page.fill_valid();
    page.dom.submit(page.form);
    assert_eq!(page.dom.listener_count(), before + 2);

    let (backdrop, _) = site.submission().unwrap().overlay().unwrap();
    page.dom.click(backdrop);
    assert_eq!(page.dom.listener_count(), before);
}

#[test]
fn test_blur_revalidates_single_field() {
    let (page, _site) = mounted();

    page.dom.set_value(page.phone, "082123456");
    page.dom.blur(page.phone);
    assert!(page.is_marked(page.phone));
    assert_eq!(
        page.message_for(page.phone).as_deref(),
        Some(FieldRule::Phone.blur_message())
    );

    page.dom.set_value(page.phone, "0821234567");
    page.dom.blur(page.phone);
    assert!(!page.is_marked(page.phone));
    assert_eq!(page.message_for(page.phone), None);

    page.dom.set_value(page.id_number, "x");
    page.dom.blur(page.id_number);
    assert_eq!(
        page.message_for(page.id_number).as_deref(),
        Some("Please enter a valid 13-digit ID number or passport number")
    );

    // Empty is not a format error on blur
    page.dom.set_value(page.id_number, "");
    page.dom.blur(page.id_number);
    assert!(!page.is_marked(page.id_number));
}

#[test]
fn test_blur_does_not_touch_other_fields() {
    let (page, _site) = mounted();
    page.dom.submit(page.form);
    assert!(page.is_marked(page.first_name));

    page.dom.set_value(page.email, "bad");
    page.dom.blur(page.email);
    assert!(page.is_marked(page.first_name));
    assert!(page.is_marked(page.email));
}

#[test]
fn test_input_clears_error_without_revalidating() {
    let (page, _site) = mounted();
    page.dom.set_value(page.email, "bad");
    page.dom.blur(page.email);
    assert!(page.is_marked(page.email));

    page.dom.type_text(page.email, "still bad");
    assert!(!page.is_marked(page.email));
    assert_eq!(page.message_for(page.email), None);
    assert_eq!(page.dom.style(&page.email, "border-color"), "");

    // Typing into an unmarked field changes nothing
    let before = page.dom.snapshot(page.form);
    page.dom.type_text(page.notes, "");
    assert_eq!(page.dom.snapshot(page.form), before);
}

#[rstest]
#[case::email_without_domain("email", "learner@omrc", "Please enter a valid email address")]
#[case::email_with_space("email", "learner @omrc.org.za", "Please enter a valid email address")]
#[case::short_phone(
    "phone",
    "082 123 456",
    "Please enter a valid South African phone number (e.g., 0821234567 or +27821234567)"
)]
#[case::foreign_phone(
    "phone",
    "+44 20 7946 0958",
    "Please enter a valid South African phone number (e.g., 0821234567 or +27821234567)"
)]
#[case::short_passport("idNumber", "X12", "Please enter a valid 13-digit ID number or passport number")]
fn test_blur_messages(#[case] id: &str, #[case] value: &str, #[case] expected: &str) {
    let (page, _site) = mounted();
    let field = page.dom.element_by_id(id).unwrap();

    page.dom.set_value(field, value);
    page.dom.blur(field);
    assert!(page.is_marked(field));
    assert_eq!(page.message_for(field).as_deref(), Some(expected));
}
