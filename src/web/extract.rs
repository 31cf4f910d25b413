//! Extraction boundary trait for web integration.
//!
//! The interception layer reads requests only through [`InboundRequest`], so
//! any framework's request type can be plugged in.

use crate::payload::Payload;

/// The parts of an inbound request the pipeline consumes.
///
/// # Examples
///
/// ```
/// use case_pipeline::web::InboundRequest;
/// use case_pipeline::Payload;
///
/// struct MyFrameworkRequest {
///     id: String,
///     path: String,
///     crn: Option<String>,
/// }
///
/// impl InboundRequest for MyFrameworkRequest {
///     fn request_id(&self) -> &str {
///         &self.id
///     }
///
///     fn path(&self) -> &str {
///         &self.path
///     }
///
///     fn query(&self) -> Option<&str> {
///         None
///     }
///
///     fn route_param(&self, name: &str) -> Option<&str> {
///         (name == "crn").then_some(self.crn.as_deref()).flatten()
///     }
///
///     fn payload(&self) -> Payload {
///         Payload::default()
///     }
/// }
/// ```
pub trait InboundRequest {
    /// Identifier used to correlate log events.
    fn request_id(&self) -> &str;

    /// Request path without the query string.
    fn path(&self) -> &str;

    /// Raw query string without the leading `?`, if any.
    fn query(&self) -> Option<&str>;

    /// Value of a named route parameter.
    fn route_param(&self, name: &str) -> Option<&str>;

    /// The request body as an untyped payload.
    fn payload(&self) -> Payload;
}
