//! Framework-neutral request type.

use std::collections::HashMap;

use serde_json::Value;

use crate::payload::Payload;

use super::InboundRequest;

/// Owned, framework-neutral view of an HTTP request.
///
/// Framework integrations build one of these (typically via a `From` impl
/// for their own request type) and hand it to the
/// [`Interceptor`](super::Interceptor).
///
/// # Examples
///
/// ```
/// use case_pipeline::web::{InboundRequest, RequestAdapter};
/// use serde_json::json;
///
/// let mut adapter = RequestAdapter::new("req-12345", "/case/x123/appointments?tab=past");
/// adapter.add_path_param("crn", "x123");
/// adapter.set_body(json!({ "startTime": "2:30pm" }));
///
/// assert_eq!(adapter.path(), "/case/x123/appointments");
/// assert_eq!(adapter.query(), Some("tab=past"));
/// assert_eq!(adapter.route_param("crn"), Some("x123"));
/// assert_eq!(adapter.payload().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    path: String,
    query: Option<String>,
    path_params: HashMap<String, String>,
    body: Payload,
}

impl RequestAdapter {
    /// Creates an adapter for `uri`, split into path and query.
    pub fn new(request_id: impl Into<String>, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (uri, None),
        };

        Self {
            request_id: request_id.into(),
            path: path.to_string(),
            query,
            path_params: HashMap::new(),
            body: Payload::default(),
        }
    }

    /// Adds a route parameter resolved by the router.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.path_params.insert(key.into(), value.into());
    }

    /// Sets a JSON request body.
    pub fn set_body(&mut self, body: Value) {
        self.body = Payload::new(body);
    }

    /// Sets a decoded form body.
    pub fn set_form<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Payload::from_form(pairs);
    }

    /// Number of route parameters.
    pub fn path_params_count(&self) -> usize {
        self.path_params.len()
    }
}

impl InboundRequest for RequestAdapter {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn route_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    fn payload(&self) -> Payload {
        self.body.clone()
    }
}
