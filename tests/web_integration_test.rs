//! Integration tests for request interception.
//!
//! These tests drive the example handlers through the interceptor the way a
//! framework integration would.

use case_pipeline::web::example_handler::{
    appointment_registry, handle_arrange_appointment, handle_case_overview, CaseOverview,
};
use case_pipeline::web::{
    CanonicalReference, Interceptor, Interrupt, Outcome, Phase, RecordedResponse, Redirect, Reply,
    RequestAdapter,
};
use case_pipeline::{Error, FixedClock, PipelineConfig};
use chrono::NaiveDate;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn case_request(request_id: &str, uri: &str, crn: &str) -> RequestAdapter {
    let mut request = RequestAdapter::new(request_id, uri);
    request.add_path_param("crn", crn);
    request
}

fn clock() -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid instant"),
    )
}

#[test]
fn lower_case_reference_redirects_before_handler() {
    init_tracing();
    let interceptor = Interceptor::from_config(&PipelineConfig::default());
    let mut response = RecordedResponse::new();

    let outcome = interceptor.intercept(
        &case_request("req-canon-1", "/case/abc123/detail", "abc123"),
        &mut response,
        |_| -> Result<Reply<()>, Interrupt<Error>> { panic!("handler must not run") },
    );

    assert!(matches!(outcome, Ok(Outcome::Redirected(_))));
    assert_eq!(response.status(), Some(302));
    assert_eq!(response.location(), Some("/case/ABC123/detail"));
}

#[test]
fn query_string_survives_canonical_redirect() {
    init_tracing();
    let interceptor = Interceptor::new().with_canonical(CanonicalReference::new("crn"));
    let mut response = RecordedResponse::new();

    interceptor
        .intercept(
            &case_request("req-canon-2", "/case/x1/notes?page=2&sort=desc", "x1"),
            &mut response,
            handle_case_overview,
        )
        .expect("redirects are not failures");

    assert_eq!(response.location(), Some("/case/X1/notes?page=2&sort=desc"));
}

#[test]
fn canonical_reference_renders_handler_view() {
    init_tracing();
    let interceptor = Interceptor::from_config(&PipelineConfig::default());
    let mut response = RecordedResponse::new();

    let outcome = interceptor
        .intercept(
            &case_request("req-canon-3", "/case/ABC123/detail", "ABC123"),
            &mut response,
            handle_case_overview,
        )
        .expect("overview never fails");

    assert_eq!(outcome.phase(), Phase::Normal);
    assert_eq!(
        outcome,
        Outcome::Rendered(CaseOverview {
            request_id: "req-canon-3".to_string(),
            crn: "ABC123".to_string(),
        })
    );
    assert!(response.is_untouched());
}

#[test]
fn configured_status_is_used_for_canonical_redirects() {
    init_tracing();
    let config = PipelineConfig {
        canonical_redirect_status: 301,
        ..PipelineConfig::default()
    };
    let mut response = RecordedResponse::new();

    Interceptor::from_config(&config)
        .intercept(
            &case_request("req-canon-4", "/case/ab", "ab"),
            &mut response,
            handle_case_overview,
        )
        .expect("redirects are not failures");

    assert_eq!(response.status(), Some(301));
}

#[test]
fn returned_redirect_is_written_once() {
    init_tracing();
    let interceptor = Interceptor::from_config(&PipelineConfig::default());
    let mut response = RecordedResponse::new();

    let outcome = interceptor.intercept(
        &case_request("req-done", "/case/ABC/detail", "ABC"),
        &mut response,
        |_| Ok::<_, Interrupt<Error>>(Reply::<()>::Redirect(Redirect::with_status("/done", 303))),
    );

    assert!(matches!(outcome, Ok(Outcome::Redirected(ref r)) if r.url() == "/done"));
    assert_eq!(response.status(), Some(303));
    assert_eq!(response.location(), Some("/done"));
    assert_eq!(response.redirect_count(), 1);
}

#[test]
fn raised_redirect_from_helper_is_resolved() {
    init_tracing();
    let interceptor = Interceptor::new();
    let mut response = RecordedResponse::new();

    // No crn parameter: the handler's helper raises a redirect to search.
    let request = RequestAdapter::new("req-search", "/case");
    let outcome = interceptor.intercept(&request, &mut response, handle_case_overview);

    assert!(matches!(outcome, Ok(Outcome::Redirected(_))));
    assert_eq!(response.location(), Some("/search"));
    assert_eq!(response.status(), Some(302));
}

#[test]
fn appointment_post_redirects_after_success() {
    init_tracing();
    let registry = appointment_registry().expect("shapes register");
    let interceptor = Interceptor::from_config(&PipelineConfig::default());
    let clock = clock();

    let mut request = case_request("req-arrange-1", "/case/X9/appointments/arrange", "X9");
    request.set_form([
        ("date", "2024-06-11"),
        ("startTime", "9:00am"),
        ("endTime", "10:00am"),
        ("sendReminder", "true"),
    ]);
    let mut response = RecordedResponse::new();

    let outcome = interceptor
        .intercept(&request, &mut response, |req| {
            handle_arrange_appointment(&registry, &clock, req)
        })
        .expect("registry is complete");

    assert!(outcome.is_redirect());
    assert_eq!(response.status(), Some(303));
    assert_eq!(response.location(), Some("/case/X9/appointments"));
}

#[test]
fn appointment_post_with_bad_times_rerenders() {
    init_tracing();
    let registry = appointment_registry().expect("shapes register");
    let interceptor = Interceptor::from_config(&PipelineConfig::default());
    let clock = clock();

    let mut request = case_request("req-arrange-2", "/case/X9/appointments/arrange", "X9");
    request.set_body(json!({
        "date": "2024-06-11",
        "startTime": "2pm",
        "endTime": "1:00pm",
    }));
    let mut response = RecordedResponse::new();

    let outcome = interceptor
        .intercept(&request, &mut response, |req| {
            handle_arrange_appointment(&registry, &clock, req)
        })
        .expect("validation failures render");

    let page = match outcome {
        Outcome::Rendered(page) => page,
        Outcome::Redirected(r) => panic!("unexpected redirect to {r}"),
    };
    assert!(response.is_untouched());
    // "2pm" is malformed, so the ordering check on endTime does not apply.
    let failed: Vec<_> = page.errors.iter().map(|e| (e.property, e.constraint)).collect();
    assert_eq!(failed, vec![("startTime", "isValidTime")]);
}

#[test]
fn handler_failure_leaves_response_untouched() {
    init_tracing();
    let empty = case_pipeline::ShapeRegistry::builder()
        .build()
        .expect("empty registry builds");
    let clock = clock();
    let mut response = RecordedResponse::new();

    let result = Interceptor::from_config(&PipelineConfig::default()).intercept(
        &case_request("req-fail", "/case/X9/appointments/arrange", "X9"),
        &mut response,
        |req| handle_arrange_appointment(&empty, &clock, req),
    );

    assert!(matches!(result, Err(Error::UnregisteredShape(_))));
    assert!(response.is_untouched());
}
