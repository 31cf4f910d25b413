//! End-to-end transformation: payload in, validated typed object out.

use case_pipeline::{
    compose, After, Coercion, ConstraintOptions, Error, FixedClock, GroupSet, Payload, RuleSet,
    Shape, ShapeDecl, ShapeRegistry, ValidTime, ValidationContext,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Visit {
    start_time: Option<String>,
    end_time: Option<String>,
    interpreter_needed: Option<bool>,
    officer_notes: Option<String>,
}

fn start_time(visit: &Visit) -> Option<&str> {
    visit.start_time.as_deref()
}

fn end_time(visit: &Visit) -> Option<&str> {
    visit.end_time.as_deref()
}

impl Shape for Visit {
    const NAME: &'static str = "Visit";

    fn expose(decl: &mut ShapeDecl) {
        decl.property("startTime").expose(GroupSet::default_only()).text();
        decl.property("endTime").expose(GroupSet::default_only()).text();
        decl.property("interpreterNeeded")
            .expose(GroupSet::default_only())
            .coerce(Coercion::Boolean)
            .boolean();
        decl.property("officerNotes")
            .expose(GroupSet::of(["officer"]))
            .coerce(Coercion::Trim)
            .text();
    }

    fn constrain(rules: &mut RuleSet<Self>) {
        rules.field("startTime", start_time).check(ValidTime);
        rules.field("endTime", end_time).composed(compose(
            ConstraintOptions::new().message("End time must be a valid time after the start"),
            vec![Box::new(ValidTime), Box::new(After::new(start_time))],
        ));
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 10)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid instant")
}

fn registry() -> ShapeRegistry {
    ShapeRegistry::builder()
        .register::<Visit>()
        .and_then(|b| b.build())
        .expect("registration succeeds")
}

#[test]
fn form_post_becomes_validated_object() {
    let clock = FixedClock::new(now());
    let ctx = ValidationContext::new(&clock);
    let payload = Payload::from_form([
        ("startTime", "10:00am"),
        ("endTime", "11:30am"),
        ("interpreterNeeded", "TRUE"),
        ("officerNotes", "  internal  "),
        ("csrf", "token"),
    ]);

    let visit = registry()
        .transform::<Visit>(&payload, &GroupSet::new(), &ctx)
        .expect("valid visit")
        .into_inner();

    assert_eq!(
        visit,
        Visit {
            start_time: Some("10:00am".to_string()),
            end_time: Some("11:30am".to_string()),
            interpreter_needed: Some(true),
            officer_notes: None,
        }
    );
}

#[test]
fn officer_group_sees_notes_only() {
    let payload = Payload::new(json!({ "startTime": "10:00am", "officerNotes": "  internal  " }));

    let visit: Visit = registry()
        .map_to_typed(&payload, &GroupSet::of(["officer"]))
        .expect("mapping never fails on data");

    assert_eq!(visit.officer_notes.as_deref(), Some("internal"));
    assert_eq!(visit.start_time, None);
}

#[test]
fn false_reminder_is_undetermined() {
    let payload = Payload::from_form([("interpreterNeeded", "false")]);
    let visit: Visit = registry().map_to_typed(&payload, &GroupSet::new()).expect("maps");
    assert_eq!(visit.interpreter_needed, None);
}

#[test]
fn composed_rules_share_one_message() {
    let clock = FixedClock::new(now());
    let ctx = ValidationContext::new(&clock);
    let payload = Payload::new(json!({ "startTime": "10:00am", "endTime": "9:00am" }));

    let err = registry()
        .transform::<Visit>(&payload, &GroupSet::new(), &ctx)
        .expect_err("end before start");

    let errors = match err {
        Error::Validation(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    let failure = &errors.errors()[0];
    assert_eq!(failure.property, "endTime");
    assert_eq!(failure.constraint, "isAfter");
    assert_eq!(failure.message, "End time must be a valid time after the start");
}

#[test]
fn malformed_start_only_fails_its_own_rule() {
    let clock = FixedClock::new(now());
    let ctx = ValidationContext::new(&clock);
    let payload = Payload::new(json!({ "startTime": "14:00", "endTime": "3:00pm" }));

    let err = registry()
        .transform::<Visit>(&payload, &GroupSet::new(), &ctx)
        .expect_err("start is not a 12-hour time");

    let errors = match err {
        Error::Validation(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.for_property("startTime").count(), 1);
    assert_eq!(errors.for_property("endTime").count(), 0);
}

#[test]
fn unregistered_shape_is_reported() {
    let empty = ShapeRegistry::builder().build().expect("empty registry builds");
    let err = empty
        .map_to_typed::<Visit>(&Payload::default(), &GroupSet::new())
        .expect_err("not registered");
    assert!(matches!(err, Error::UnregisteredShape("Visit")));
}

#[test]
fn global_registry_installs_once() {
    let installed = registry().install().expect("first install succeeds");
    assert!(installed.contains::<Visit>());
    assert!(ShapeRegistry::global().is_some());

    let second = registry().install();
    assert!(matches!(second, Err(Error::RegistryInstalled)));
}
