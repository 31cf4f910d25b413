//! Value coercions applied while mapping.

use serde_json::Value;

/// A coercion declared on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// [`to_boolean`]; an undetermined result becomes `null`.
    Boolean,
    /// Trims surrounding whitespace from strings; other values pass through.
    Trim,
}

impl Coercion {
    /// Applies the coercion to a raw payload value.
    pub fn apply(self, raw: &Value) -> Value {
        match self {
            Coercion::Boolean => to_boolean(raw).map_or(Value::Null, Value::Bool),
            Coercion::Trim => match raw {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            },
        }
    }
}

/// Returns `Some(true)` only when `raw` confidently means true.
///
/// - `true` passes through
/// - strings are lower-cased and parsed as JSON; only a parsed `true` counts
/// - everything else, `false` and `"false"` included, is undetermined
///
/// Never returns `Some(false)`.
///
/// # Examples
///
/// ```
/// use case_pipeline::to_boolean;
/// use serde_json::json;
///
/// assert_eq!(to_boolean(&json!("TRUE")), Some(true));
/// assert_eq!(to_boolean(&json!("false")), None);
/// assert_eq!(to_boolean(&json!(false)), None);
/// assert_eq!(to_boolean(&json!(123)), None);
/// ```
pub fn to_boolean(raw: &Value) -> Option<bool> {
    let confirmed = match raw {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            serde_json::from_str::<Value>(&s.to_lowercase()),
            Ok(Value::Bool(true))
        ),
        _ => false,
    };

    confirmed.then_some(true)
}
