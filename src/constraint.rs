//! Constraint engine.
//!
//! Constraints are pure predicates over one candidate value, optionally read
//! against a sibling property of the object being validated. They report
//! pass/fail and nothing else:
//! - malformed input in the candidate itself fails (`ValidTime`)
//! - malformed input in a cross-field rule is "not applicable" and passes
//!   (`After`, `FutureTime`)
//!
//! Rules are bound to properties through a [`RuleSet`], which is declared once
//! per shape and evaluated against each typed object the pipeline produces.

mod rules;
mod time;

pub use rules::{
    compose, Accessor, After, Composed, Constraint, ConstraintOptions, FieldRules, FutureTime,
    RuleSet, ValidTime, ValidationContext,
};
pub use time::{is_after, is_future_time, is_valid_time, parse_date, parse_time, TIME_FORMAT};
