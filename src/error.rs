use std::fmt;

use thiserror::Error;

/// Errors that can occur while building or using the transformation pipeline.
///
/// Mapping a payload never fails on bad *data*; these variants describe bad
/// *metadata* (a shape that was never registered, a struct that disagrees with
/// its own declaration) or a failed constraint pass.
#[derive(Debug, Error)]
pub enum Error {
    /// The shape was used before it was registered.
    #[error("shape '{0}' is not registered")]
    UnregisteredShape(&'static str),

    /// A shape declared the same property twice.
    #[error("shape '{shape}' declares property '{property}' more than once")]
    DuplicateProperty {
        /// Shape being registered
        shape: &'static str,
        /// Offending property name
        property: &'static str,
    },

    /// A property refers to a nested shape that is missing from the registry.
    #[error("shape '{shape}' property '{property}' nests an unregistered shape")]
    MissingNestedShape {
        /// Shape being registered
        shape: &'static str,
        /// Property declaring the nested shape
        property: &'static str,
    },

    /// A shape was registered twice.
    #[error("shape '{0}' is already registered")]
    AlreadyRegistered(&'static str),

    /// The process-wide registry was installed more than once.
    #[error("the shape registry has already been installed")]
    RegistryInstalled,

    /// The projected payload did not deserialize into the target struct.
    ///
    /// This only happens when the Rust struct and its declared properties
    /// disagree; payload content alone cannot trigger it.
    #[error("shape '{shape}' does not match its declaration: {source}")]
    ShapeMismatch {
        /// Target shape
        shape: &'static str,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// The typed object failed one or more constraints.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A single failed constraint on a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Property the constraint is bound to
    pub property: &'static str,
    /// Name of the failing constraint (e.g. `"isValidTime"`)
    pub constraint: &'static str,
    /// Message for the view layer
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        property: &'static str,
        constraint: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            property,
            constraint,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.property, self.constraint, self.message)
    }
}

/// All constraint failures from one validation pass, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed for {} constraint(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns every recorded failure.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the failures bound to `property`.
    pub fn for_property<'a>(
        &'a self,
        property: &'a str,
    ) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.property == property)
    }

    /// Returns true if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Errors raised while loading [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A redirect status outside the 3xx range.
    #[error("redirect status {0} is not a 3xx code")]
    InvalidRedirectStatus(u16),

    /// An environment variable held something unparsable.
    #[error("environment variable {name} has an invalid value")]
    InvalidVar {
        /// Variable name
        name: &'static str,
    },

    /// The reference parameter name was empty.
    #[error("reference parameter name must not be empty")]
    EmptyReferenceParam,
}
