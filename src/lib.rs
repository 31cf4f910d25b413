//! Declarative request/response pipeline for case-management web handlers.
//!
//! This crate turns loosely-typed request payloads into typed, validated
//! objects and keeps handlers free of redirect plumbing:
//! - **Constraints**: Time-format, ordering and future-time rules bound to
//!   shape properties, composable under one message
//! - **Transformation**: Group-aware mapping of payloads onto registered
//!   shapes, with per-property coercions such as strict boolean conversion
//! - **Interception**: Canonical upper-case case references in paths, and
//!   redirects that handlers return or raise with `?`
//!
//! # Core Types
//!
//! - [`Shape`]: Declares a typed object's exposed properties and rules
//! - [`ShapeRegistry`]: Frozen metadata registry that maps and validates
//! - [`Validated<T>`]: Object that passed every applicable rule
//! - [`web::Interceptor`]: Wraps handler calls with redirect handling
//!
//! # Examples
//!
//! ```
//! use case_pipeline::{is_after, is_future_time, is_valid_time, to_boolean};
//! use chrono::NaiveDate;
//! use serde_json::json;
//!
//! assert!(is_valid_time(Some("2:30pm")));
//! assert!(!is_valid_time(Some("14:30")));
//!
//! assert!(is_after(Some("3:00pm"), Some("2:00pm")));
//! assert!(is_after(Some("garbage"), Some("2:00pm")));
//!
//! let now = NaiveDate::from_ymd_opt(2024, 6, 10)
//!     .and_then(|d| d.and_hms_opt(9, 0, 0))
//!     .expect("valid timestamp");
//! assert!(is_future_time(Some("9:01am"), Some("2024-06-10"), now));
//! assert!(!is_future_time(Some("9:00am"), Some("2024-06-10"), now));
//!
//! assert_eq!(to_boolean(&json!("TRUE")), Some(true));
//! assert_eq!(to_boolean(&json!("false")), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod coerce;
mod config;
mod constraint;
mod error;
mod expose;
mod logging;
mod payload;
mod registry;
mod shape;
mod validated;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use coerce::{to_boolean, Coercion};
pub use config::{PipelineConfig, CANONICAL_STATUS_VAR, REFERENCE_PARAM_VAR};
pub use constraint::{
    compose, is_after, is_future_time, is_valid_time, parse_date, parse_time, Accessor, After,
    Composed, Constraint, ConstraintOptions, FieldRules, FutureTime, RuleSet, ValidTime,
    ValidationContext, TIME_FORMAT,
};
pub use error::{ConfigError, Error, ValidationError, ValidationErrors};
pub use expose::{default_exposure, ExposureGroup, GroupSet, DEFAULT_GROUP};
pub use logging::RequestLog;
pub use payload::Payload;
pub use registry::{ShapeRegistry, ShapeRegistryBuilder};
pub use shape::{FieldKind, NestedShape, PropertyBuilder, PropertyDecl, Shape, ShapeDecl};
pub use validated::Validated;
