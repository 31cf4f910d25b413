//! Property-bound constraints and their composition.

use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{ValidationError, ValidationErrors};
use crate::expose::GroupSet;

use super::time::{is_after, is_future_time, is_valid_time};

/// Typed accessor for a string property of `T`.
///
/// Cross-field rules capture one of these at declaration time instead of a
/// property name.
pub type Accessor<T> = fn(&T) -> Option<&str>;

/// Everything a constraint may read besides the object itself.
pub struct ValidationContext<'a> {
    clock: &'a dyn Clock,
    groups: GroupSet,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context that runs every rule.
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            groups: GroupSet::new(),
        }
    }

    /// Restricts the pass to ungrouped rules plus rules in `groups`.
    pub fn with_groups(mut self, groups: GroupSet) -> Self {
        self.groups = groups;
        self
    }

    /// Returns the clock time-aware rules read from.
    pub fn clock(&self) -> &dyn Clock {
        self.clock
    }

    fn runs(&self, options: &ConstraintOptions) -> bool {
        self.groups.is_empty()
            || options.groups.is_empty()
            || options.groups.intersects(&self.groups)
    }
}

impl fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

/// A named rule over one candidate value of a `T`.
///
/// Implementations must be deterministic given the object and the context's
/// clock, and must never panic on malformed input.
pub trait Constraint<T>: Send + Sync {
    /// Rule name reported in [`ValidationError::constraint`].
    fn name(&self) -> &'static str;

    /// Message used when the binding has no explicit one.
    fn default_message(&self) -> &'static str;

    /// Returns true if `candidate` satisfies the rule.
    fn check(&self, candidate: Option<&str>, object: &T, ctx: &ValidationContext<'_>) -> bool;
}

/// Options shared by every rule applied through one binding or composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintOptions {
    message: Option<String>,
    groups: GroupSet,
}

impl ConstraintOptions {
    /// Options with no message override and no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Limits the rule to validation passes requesting one of `groups`.
    pub fn groups(mut self, groups: GroupSet) -> Self {
        self.groups = groups;
        self
    }
}

/// Candidate must be a `H:MMam/pm` time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidTime;

impl<T> Constraint<T> for ValidTime {
    fn name(&self) -> &'static str {
        "isValidTime"
    }

    fn default_message(&self) -> &'static str {
        "must be a valid time, for example 2:30pm"
    }

    fn check(&self, candidate: Option<&str>, _object: &T, _ctx: &ValidationContext<'_>) -> bool {
        is_valid_time(candidate)
    }
}

/// Candidate must be later in the day than a sibling time.
pub struct After<T> {
    sibling: Accessor<T>,
}

impl<T> After<T> {
    /// Compares against the property returned by `sibling`.
    pub fn new(sibling: Accessor<T>) -> Self {
        Self { sibling }
    }
}

impl<T> Constraint<T> for After<T> {
    fn name(&self) -> &'static str {
        "isAfter"
    }

    fn default_message(&self) -> &'static str {
        "must be after the earlier time"
    }

    fn check(&self, candidate: Option<&str>, object: &T, _ctx: &ValidationContext<'_>) -> bool {
        is_after(candidate, (self.sibling)(object))
    }
}

/// Candidate time on a sibling date must be at least a minute from now.
pub struct FutureTime<T> {
    date: Accessor<T>,
}

impl<T> FutureTime<T> {
    /// Combines the candidate with the date returned by `date`.
    pub fn new(date: Accessor<T>) -> Self {
        Self { date }
    }
}

impl<T> Constraint<T> for FutureTime<T> {
    fn name(&self) -> &'static str {
        "isFutureTime"
    }

    fn default_message(&self) -> &'static str {
        "must be in the future"
    }

    fn check(&self, candidate: Option<&str>, object: &T, ctx: &ValidationContext<'_>) -> bool {
        is_future_time(candidate, (self.date)(object), ctx.clock().now())
    }
}

/// Several rules checked as one unit under a single set of options.
///
/// Bound through [`FieldRules::composed`]; each rule still reports its own
/// name on failure. A composition is not itself a [`Constraint`], so
/// [`FieldRules::check`] does not accept one:
///
/// ```compile_fail
/// use case_pipeline::{compose, ConstraintOptions, RuleSet, ValidTime};
///
/// struct Slot { end: Option<String> }
/// fn end(s: &Slot) -> Option<&str> { s.end.as_deref() }
///
/// let mut rules = RuleSet::<Slot>::new();
/// rules
///     .field("end", end)
///     .check(compose(ConstraintOptions::new(), vec![Box::new(ValidTime)]));
/// ```
pub struct Composed<T> {
    options: Arc<ConstraintOptions>,
    rules: Vec<Box<dyn Constraint<T>>>,
}

/// Applies `options` to every rule in `rules`.
///
/// # Examples
///
/// ```
/// use case_pipeline::{compose, After, Composed, ConstraintOptions, ValidTime};
///
/// struct Slot { start: Option<String> }
/// fn start(s: &Slot) -> Option<&str> { s.start.as_deref() }
///
/// let end_rules: Composed<Slot> = compose(
///     ConstraintOptions::new().message("Enter an end time after the start time"),
///     vec![Box::new(ValidTime), Box::new(After::new(start))],
/// );
/// assert_eq!(end_rules.len(), 2);
/// ```
pub fn compose<T>(options: ConstraintOptions, rules: Vec<Box<dyn Constraint<T>>>) -> Composed<T> {
    Composed {
        options: Arc::new(options),
        rules,
    }
}

impl<T> Composed<T> {
    /// Number of composed rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if nothing was composed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

struct Binding<T> {
    property: &'static str,
    accessor: Accessor<T>,
    constraint: Box<dyn Constraint<T>>,
    options: Arc<ConstraintOptions>,
}

/// Every constraint declared for one shape, in declaration order.
pub struct RuleSet<T> {
    bindings: Vec<Binding<T>>,
}

impl<T> RuleSet<T> {
    /// An empty rule set.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Starts binding rules to `property`, read through `accessor`.
    pub fn field(&mut self, property: &'static str, accessor: Accessor<T>) -> FieldRules<'_, T> {
        FieldRules {
            set: self,
            property,
            accessor,
        }
    }

    /// Number of bound rules.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no rules are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Runs every applicable rule against `object`, collecting failures.
    pub fn evaluate(&self, object: &T, ctx: &ValidationContext<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        for binding in self.bindings.iter().filter(|b| ctx.runs(&b.options)) {
            let candidate = (binding.accessor)(object);
            if binding.constraint.check(candidate, object, ctx) {
                continue;
            }

            let message = binding
                .options
                .message
                .clone()
                .unwrap_or_else(|| binding.constraint.default_message().to_string());
            tracing::debug!(
                property = binding.property,
                constraint = binding.constraint.name(),
                "constraint not satisfied"
            );
            errors.push(ValidationError::new(
                binding.property,
                binding.constraint.name(),
                message,
            ));
        }

        errors
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder binding rules to a single property.
pub struct FieldRules<'a, T> {
    set: &'a mut RuleSet<T>,
    property: &'static str,
    accessor: Accessor<T>,
}

impl<T> FieldRules<'_, T> {
    /// Binds `constraint` with default options.
    pub fn check(self, constraint: impl Constraint<T> + 'static) -> Self {
        self.check_with(ConstraintOptions::default(), constraint)
    }

    /// Binds `constraint` with `options`.
    pub fn check_with(
        self,
        options: ConstraintOptions,
        constraint: impl Constraint<T> + 'static,
    ) -> Self {
        self.push(Box::new(constraint), Arc::new(options))
    }

    /// Binds every rule of `composed`, sharing its options.
    pub fn composed(mut self, composed: Composed<T>) -> Self {
        let Composed { options, rules } = composed;
        for rule in rules {
            self = self.push(rule, Arc::clone(&options));
        }
        self
    }

    fn push(self, constraint: Box<dyn Constraint<T>>, options: Arc<ConstraintOptions>) -> Self {
        self.set.bindings.push(Binding {
            property: self.property,
            accessor: self.accessor,
            constraint,
            options,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    struct Visit {
        date: Option<String>,
        start: Option<String>,
        end: Option<String>,
    }

    fn date(v: &Visit) -> Option<&str> {
        v.date.as_deref()
    }

    fn start(v: &Visit) -> Option<&str> {
        v.start.as_deref()
    }

    fn end(v: &Visit) -> Option<&str> {
        v.end.as_deref()
    }

    fn visit(date: &str, start: &str, end: &str) -> Visit {
        Visit {
            date: Some(date.to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
        )
    }

    fn rules() -> RuleSet<Visit> {
        let mut rules = RuleSet::new();
        rules
            .field("start", start)
            .check(ValidTime)
            .check(FutureTime::new(date));
        rules.field("end", end).composed(compose(
            ConstraintOptions::new().message("Enter an end time after the start time"),
            vec![Box::new(ValidTime), Box::new(After::new(start))],
        ));
        rules
    }

    #[test]
    fn passing_object_has_no_errors() {
        let clock = clock();
        let ctx = ValidationContext::new(&clock);

        let errors = rules().evaluate(&visit("2024-03-05", "1:00pm", "2:00pm"), &ctx);
        assert!(errors.is_empty());
    }

    #[test]
    fn composed_rules_share_message_but_keep_names() {
        let clock = clock();
        let ctx = ValidationContext::new(&clock);

        let errors = rules().evaluate(&visit("2024-03-05", "1:00pm", "12:30pm"), &ctx);
        assert_eq!(errors.len(), 1);
        let error = &errors.errors()[0];
        assert_eq!(error.property, "end");
        assert_eq!(error.constraint, "isAfter");
        assert_eq!(error.message, "Enter an end time after the start time");
    }

    #[test]
    fn invalid_start_only_fails_format_rule() {
        let clock = clock();
        let ctx = ValidationContext::new(&clock);

        // After and FutureTime both see an unparsable start and pass.
        let errors = rules().evaluate(&visit("2024-03-05", "13:00", "2:00pm"), &ctx);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].constraint, "isValidTime");
        assert_eq!(
            errors.errors()[0].message,
            "must be a valid time, for example 2:30pm"
        );
    }

    #[test]
    fn past_start_fails_future_rule() {
        let clock = clock();
        let ctx = ValidationContext::new(&clock);

        let errors = rules().evaluate(&visit("2024-03-05", "11:00am", "2:00pm"), &ctx);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].constraint, "isFutureTime");
    }

    #[test]
    fn missing_end_fails_only_format() {
        let clock = clock();
        let ctx = ValidationContext::new(&clock);
        let mut v = visit("2024-03-05", "1:00pm", "");
        v.end = None;

        let errors = rules().evaluate(&v, &ctx);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].property, "end");
        assert_eq!(errors.errors()[0].constraint, "isValidTime");
    }

    #[test]
    fn grouped_rules_only_run_for_matching_groups() {
        let clock = clock();
        let mut rules = RuleSet::new();
        rules
            .field("end", end)
            .check_with(ConstraintOptions::new().groups(GroupSet::of(["arrange"])), ValidTime);
        let bad = visit("2024-03-05", "1:00pm", "bad");

        let all = ValidationContext::new(&clock);
        assert_eq!(rules.evaluate(&bad, &all).len(), 1);

        let other = ValidationContext::new(&clock).with_groups(GroupSet::of(["reschedule"]));
        assert!(rules.evaluate(&bad, &other).is_empty());

        let arrange = ValidationContext::new(&clock).with_groups(GroupSet::of(["arrange"]));
        assert_eq!(rules.evaluate(&bad, &arrange).len(), 1);
    }

    #[test]
    fn composed_options_apply_to_every_rule() {
        let clock = clock();
        let mut rules = RuleSet::new();
        rules.field("end", end).composed(compose(
            ConstraintOptions::new()
                .message("Enter an end time after the start time")
                .groups(GroupSet::of(["arrange"])),
            vec![Box::new(ValidTime), Box::new(After::new(start))],
        ));
        assert_eq!(rules.len(), 2);
        let early = visit("2024-03-05", "1:00pm", "12:30pm");

        let other = ValidationContext::new(&clock).with_groups(GroupSet::of(["other"]));
        assert!(rules.evaluate(&early, &other).is_empty());

        let arrange = ValidationContext::new(&clock).with_groups(GroupSet::of(["arrange"]));
        let errors = rules.evaluate(&early, &arrange);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].constraint, "isAfter");
        assert_eq!(errors.errors()[0].message, "Enter an end time after the start time");

        let malformed = visit("2024-03-05", "1:00pm", "later");
        let errors = rules.evaluate(&malformed, &arrange);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].constraint, "isValidTime");
        assert_eq!(errors.errors()[0].message, "Enter an end time after the start time");
    }
}
