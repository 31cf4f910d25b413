use std::fmt;

use crate::web::{Phase, Redirect};

/// Request-scoped logger.
///
/// Every event carries the request id. Phase changes and redirects are
/// control flow, not failures, so they are emitted at `debug`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
}

impl<'a> RequestLog<'a> {
    /// Creates a logger bound to `request_id`.
    pub fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request id attached to every event.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Records entry into an interception phase.
    pub fn phase(&self, phase: Phase) {
        tracing::debug!(request_id = %self.request_id, %phase, "interception phase");
    }

    /// Records a redirect being issued.
    pub fn redirect(&self, redirect: &Redirect) {
        tracing::debug!(
            request_id = %self.request_id,
            location = redirect.url(),
            status = redirect.status_code(),
            "issuing redirect"
        );
    }

    /// Logs an info-level message with request ID.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}
