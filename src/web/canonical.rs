//! Canonical case-reference paths.

use crate::config::PipelineConfig;

use super::{InboundRequest, Redirect, DEFAULT_REDIRECT_STATUS};

/// Upper-cases a case reference path segment.
///
/// The reference is read from a named route parameter. When it is not already
/// upper-case, every path segment equal to it is replaced with the upper-case
/// form and the query string is kept as-is.
///
/// # Examples
///
/// ```
/// use case_pipeline::web::{CanonicalReference, RequestAdapter};
///
/// let rule = CanonicalReference::new("crn");
///
/// let mut request = RequestAdapter::new("req-1", "/case/abc123/detail?tab=notes");
/// request.add_path_param("crn", "abc123");
/// assert_eq!(
///     rule.canonical_path(&request).as_deref(),
///     Some("/case/ABC123/detail?tab=notes")
/// );
///
/// let mut request = RequestAdapter::new("req-2", "/case/ABC123/detail");
/// request.add_path_param("crn", "ABC123");
/// assert_eq!(rule.canonical_path(&request), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalReference {
    param: String,
    status: u16,
}

impl CanonicalReference {
    /// Canonicalizes the route parameter `param`, redirecting with `302`.
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            status: DEFAULT_REDIRECT_STATUS,
        }
    }

    /// Builds the rule from configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.reference_param.clone()).with_status(config.canonical_redirect_status)
    }

    /// Overrides the redirect status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Route parameter this rule reads.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Returns the canonical path and query, or `None` when the request is
    /// already canonical or carries no reference.
    pub fn canonical_path<R: InboundRequest>(&self, request: &R) -> Option<String> {
        let reference = request.route_param(&self.param)?;
        let canonical = reference.to_uppercase();
        if canonical == reference {
            return None;
        }

        let path = request.path();
        let rewritten = path
            .split('/')
            .map(|segment| if segment == reference { canonical.as_str() } else { segment })
            .collect::<Vec<_>>()
            .join("/");

        // The reference is not a literal path segment; redirecting would loop.
        if rewritten == path {
            tracing::debug!(param = %self.param, "reference not found in path; skipping");
            return None;
        }

        Some(match request.query() {
            Some(query) if !query.is_empty() => format!("{rewritten}?{query}"),
            _ => rewritten,
        })
    }

    /// Returns the redirect to issue, if the request is not canonical.
    pub fn redirect_for<R: InboundRequest>(&self, request: &R) -> Option<Redirect> {
        self.canonical_path(request)
            .map(|target| Redirect::with_status(target, self.status))
    }
}
