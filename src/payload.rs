use std::fmt;

use serde_json::{Map, Value};

/// An untyped inbound payload awaiting transformation.
///
/// `Payload` holds a request body exactly as it arrived. Field values are not
/// readable from outside the crate; the only way to get at them is to map the
/// payload onto a registered [`Shape`](crate::Shape), which drops undeclared
/// fields and coerces the rest.
///
/// Anything other than a JSON object becomes an empty payload.
///
/// # Examples
///
/// ```
/// use case_pipeline::Payload;
/// use serde_json::json;
///
/// let payload = Payload::new(json!({ "startTime": "2:30pm" }));
/// assert_eq!(payload.len(), 1);
/// assert!(payload.has_field("startTime"));
///
/// assert!(Payload::new(json!("not an object")).is_empty());
/// ```
#[derive(Clone, Default)]
pub struct Payload {
    // Only the mapper reads values; keep this private.
    fields: Map<String, Value>,
}

impl Payload {
    /// Wraps a JSON body.
    pub fn new(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Builds a payload from decoded form fields, all as strings.
    ///
    /// Later duplicates overwrite earlier ones.
    pub fn from_form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        }
    }

    /// Parses a JSON body. Unparsable bodies become an empty payload.
    pub fn from_json(body: &str) -> Self {
        serde_json::from_str(body).map(Self::new).unwrap_or_default()
    }

    /// Returns true if the payload carries `key`.
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Payload {
    // Field names only; values may be personal data.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
