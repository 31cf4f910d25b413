//! Example handlers demonstrating the full request pipeline.
//!
//! The handlers below serve a case's appointment pages: a canonical case
//! reference in the path, a form mapped onto a typed shape, cross-field time
//! rules, and a redirect after a successful post.
//!
//! **These examples are for documentation and testing only.**
//! They demonstrate usage patterns without requiring actual HTTP infrastructure.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::coerce::Coercion;
use crate::constraint::{
    compose, After, ConstraintOptions, FutureTime, RuleSet, ValidTime, ValidationContext,
};
use crate::error::{Error, ValidationError};
use crate::expose::{default_exposure, GroupSet};
use crate::logging::RequestLog;
use crate::registry::ShapeRegistry;
use crate::shape::{Shape, ShapeDecl};

use super::{InboundRequest, Interrupt, Redirect, Reply};

/// Route parameter carrying the case reference.
pub const CASE_REFERENCE_PARAM: &str = "crn";

/// Where requests without a case reference are sent.
pub const SEARCH_PATH: &str = "/search";

/// Appointment location sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationForm {
    /// Office code
    pub code: Option<String>,
    /// Free-text description
    pub description: Option<String>,
}

impl Shape for LocationForm {
    const NAME: &'static str = "LocationForm";

    fn expose(decl: &mut ShapeDecl) {
        decl.property("code")
            .expose(GroupSet::default_only())
            .coerce(Coercion::Trim)
            .text();
        decl.property("description")
            .expose(GroupSet::default_only())
            .text();
    }
}

/// The "arrange an appointment" form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentForm {
    /// Appointment date, `YYYY-MM-DD` or `D/M/YYYY`
    pub date: Option<String>,
    /// Start time, e.g. `2:30pm`
    pub start_time: Option<String>,
    /// End time, e.g. `3:30pm`
    pub end_time: Option<String>,
    /// Whether to send an SMS reminder; `None` when not confirmed
    pub send_reminder: Option<bool>,
    /// Practitioner notes, only mapped under the `notes` group
    pub notes: Option<String>,
    /// Where the appointment takes place
    pub location: Option<LocationForm>,
}

fn appointment_date(form: &AppointmentForm) -> Option<&str> {
    form.date.as_deref()
}

fn start_time(form: &AppointmentForm) -> Option<&str> {
    form.start_time.as_deref()
}

fn end_time(form: &AppointmentForm) -> Option<&str> {
    form.end_time.as_deref()
}

impl Shape for AppointmentForm {
    const NAME: &'static str = "AppointmentForm";

    fn expose(decl: &mut ShapeDecl) {
        decl.property("date")
            .expose(GroupSet::default_only())
            .text();
        decl.property("startTime")
            .expose(GroupSet::default_only())
            .text();
        decl.property("endTime")
            .expose(GroupSet::default_only())
            .text();
        decl.property("sendReminder")
            .expose(default_exposure(["reminders"]))
            .coerce(Coercion::Boolean)
            .boolean();
        decl.property("notes")
            .expose(GroupSet::of(["notes"]))
            .coerce(Coercion::Trim)
            .text();
        decl.property("location")
            .expose(GroupSet::default_only())
            .nested::<LocationForm>();
    }

    fn constrain(rules: &mut RuleSet<Self>) {
        rules
            .field("startTime", start_time)
            .check_with(
                ConstraintOptions::new().message("Enter a valid start time, for example 2:30pm"),
                ValidTime,
            )
            .check_with(
                ConstraintOptions::new().message("The appointment must start in the future"),
                FutureTime::new(appointment_date),
            );
        rules.field("endTime", end_time).composed(compose(
            ConstraintOptions::new().message("Enter an end time after the start time"),
            vec![Box::new(ValidTime), Box::new(After::new(start_time))],
        ));
    }
}

/// Registers every shape used by the example handlers.
///
/// # Errors
///
/// Propagates registration errors; none occur for these shapes.
pub fn appointment_registry() -> Result<ShapeRegistry, Error> {
    ShapeRegistry::builder()
        .register::<LocationForm>()?
        .register::<AppointmentForm>()?
        .build()
}

/// Reads the case reference, redirecting to search when it is missing.
///
/// Called from inside handlers; the redirect travels up through `?`.
pub fn require_reference<R: InboundRequest>(request: &R) -> Result<String, Redirect> {
    request
        .route_param(CASE_REFERENCE_PARAM)
        .map(str::to_string)
        .ok_or_else(|| Redirect::new(SEARCH_PATH))
}

/// View model for the case overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOverview {
    /// Request ID for tracing
    pub request_id: String,
    /// Canonical case reference
    pub crn: String,
}

/// Handles `GET /case/:crn`.
///
/// # Examples
///
/// ```
/// use case_pipeline::web::example_handler::handle_case_overview;
/// use case_pipeline::web::{Interceptor, Outcome, RecordedResponse, RequestAdapter};
/// use case_pipeline::PipelineConfig;
///
/// let interceptor = Interceptor::from_config(&PipelineConfig::default());
/// let mut request = RequestAdapter::new("req-1", "/case/x320741");
/// request.add_path_param("crn", "x320741");
/// let mut response = RecordedResponse::new();
///
/// let outcome = interceptor.intercept(&request, &mut response, handle_case_overview);
/// assert!(matches!(outcome, Ok(Outcome::Redirected(_))));
/// assert_eq!(response.location(), Some("/case/X320741"));
/// ```
pub fn handle_case_overview<R: InboundRequest>(
    request: &R,
) -> Result<Reply<CaseOverview>, Interrupt<Error>> {
    let crn = require_reference(request)?;

    Ok(Reply::Render(CaseOverview {
        request_id: request.request_id().to_string(),
        crn,
    }))
}

/// View model for a rejected appointment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentPage {
    /// Canonical case reference
    pub crn: String,
    /// Field-level failures for the view to display
    pub errors: Vec<ValidationError>,
}

/// Handles `POST /case/:crn/appointments/arrange`.
///
/// A valid form redirects (303) to the appointment list; an invalid one
/// re-renders with field errors.
///
/// # Errors
///
/// Returns `Interrupt::Failed` only if the registry is misconfigured.
pub fn handle_arrange_appointment<R: InboundRequest>(
    registry: &ShapeRegistry,
    clock: &dyn Clock,
    request: &R,
) -> Result<Reply<AppointmentPage>, Interrupt<Error>> {
    let crn = require_reference(request)?;
    let log = RequestLog::new(request.request_id());
    let ctx = ValidationContext::new(clock);

    let payload = request.payload();
    match registry.transform::<AppointmentForm>(&payload, &GroupSet::default_only(), &ctx) {
        Ok(_form) => {
            log.info(format_args!("appointment arranged for case {}", crn));
            Ok(Reply::Redirect(Redirect::see_other(format!("/case/{crn}/appointments"))))
        }
        Err(Error::Validation(errors)) => {
            log.debug(format_args!("appointment form rejected with {} error(s)", errors.len()));
            Ok(Reply::Render(AppointmentPage {
                crn,
                errors: errors.errors().to_vec(),
            }))
        }
        Err(other) => Err(Interrupt::Failed(other)),
    }
}
