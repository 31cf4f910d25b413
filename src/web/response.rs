//! Response side of the interception boundary.

use super::Redirect;

/// The part of a framework response the interceptor writes to.
pub trait ResponseSink {
    /// Turns the response into a redirect: status from `redirect`, `Location`
    /// set to its URL, no rendered body.
    fn redirect(&mut self, redirect: &Redirect);
}

/// In-memory response recorder.
///
/// Useful in tests and in integrations that translate the outcome into a
/// framework response afterwards.
///
/// # Examples
///
/// ```
/// use case_pipeline::web::{RecordedResponse, Redirect, ResponseSink};
///
/// let mut response = RecordedResponse::new();
/// response.redirect(&Redirect::see_other("/done"));
///
/// assert_eq!(response.status(), Some(303));
/// assert_eq!(response.location(), Some("/done"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedResponse {
    status: Option<u16>,
    location: Option<String>,
    redirects: usize,
}

impl RecordedResponse {
    /// Creates an untouched response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// `Location` header written so far, if any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Number of times a redirect was written.
    pub fn redirect_count(&self) -> usize {
        self.redirects
    }

    /// Returns true if no redirect was written.
    pub fn is_untouched(&self) -> bool {
        self.redirects == 0
    }
}

impl ResponseSink for RecordedResponse {
    fn redirect(&mut self, redirect: &Redirect) {
        self.status = Some(redirect.status_code());
        self.location = Some(redirect.url().to_string());
        self.redirects += 1;
    }
}
