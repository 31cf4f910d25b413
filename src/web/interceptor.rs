//! Handler interception.
//!
//! # Request lifecycle
//!
//! ```text
//! Routing ──> Canonicalizing ──(non-canonical)──> Redirecting
//!                   │
//!                   v
//!              Dispatched ──> Normal       (Reply::Render)
//!                   └───────> Redirecting  (Reply::Redirect, Interrupt::Redirect)
//! ```
//!
//! The response is written to at most once per request. Handler failures
//! (`Interrupt::Failed`) leave the response untouched and are returned to the
//! caller unchanged. A handler redirect whose status is not 3xx is written
//! with [`DEFAULT_REDIRECT_STATUS`] instead.

use std::fmt;

use crate::config::PipelineConfig;
use crate::logging::RequestLog;

use super::{
    CanonicalReference, InboundRequest, Interrupt, Redirect, Reply, ResponseSink,
    DEFAULT_REDIRECT_STATUS,
};

/// Per-request interception state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Route parameters are available; nothing has happened yet.
    Routing,
    /// Checking the case reference for canonical casing.
    Canonicalizing,
    /// The handler is running.
    Dispatched,
    /// The handler's view model passes through for rendering.
    Normal,
    /// A redirect was written to the response.
    Redirecting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Routing => write!(f, "routing"),
            Phase::Canonicalizing => write!(f, "canonicalizing"),
            Phase::Dispatched => write!(f, "dispatched"),
            Phase::Normal => write!(f, "normal"),
            Phase::Redirecting => write!(f, "redirecting"),
        }
    }
}

/// Terminal state of an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Hand `T` to the renderer.
    Rendered(T),
    /// A redirect was written; render nothing.
    Redirected(Redirect),
}

impl<T> Outcome<T> {
    /// The terminal phase this outcome corresponds to.
    pub fn phase(&self) -> Phase {
        match self {
            Outcome::Rendered(_) => Phase::Normal,
            Outcome::Redirected(_) => Phase::Redirecting,
        }
    }

    /// Returns true if a redirect was issued.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Outcome::Redirected(_))
    }
}

/// Wraps handler invocation with canonical-path enforcement and redirect
/// resolution.
///
/// # Examples
///
/// ```
/// use case_pipeline::web::{
///     CanonicalReference, Interceptor, Interrupt, Outcome, RecordedResponse, Redirect, Reply,
///     RequestAdapter,
/// };
///
/// let interceptor = Interceptor::new().with_canonical(CanonicalReference::new("crn"));
///
/// let mut request = RequestAdapter::new("req-1", "/case/ABC123/detail");
/// request.add_path_param("crn", "ABC123");
/// let mut response = RecordedResponse::new();
///
/// let outcome = interceptor.intercept(&request, &mut response, |_| {
///     let done = Redirect::with_status("/done", 303);
///     Ok::<_, Interrupt<std::convert::Infallible>>(Reply::<()>::Redirect(done))
/// });
///
/// assert!(matches!(outcome, Ok(Outcome::Redirected(_))));
/// assert_eq!(response.status(), Some(303));
/// assert_eq!(response.location(), Some("/done"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interceptor {
    canonical: Option<CanonicalReference>,
}

impl Interceptor {
    /// An interceptor that only resolves redirects.
    pub fn new() -> Self {
        Self::default()
    }

    /// An interceptor enforcing the configured canonical reference.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new().with_canonical(CanonicalReference::from_config(config))
    }

    /// Enables canonical-path enforcement.
    pub fn with_canonical(mut self, rule: CanonicalReference) -> Self {
        self.canonical = Some(rule);
        self
    }

    /// Runs `handler` for `request`, writing any redirect to `response`.
    ///
    /// # Errors
    ///
    /// Returns the handler's own failure unchanged.
    pub fn intercept<Req, Res, T, E, H>(
        &self,
        request: &Req,
        response: &mut Res,
        handler: H,
    ) -> Result<Outcome<T>, E>
    where
        Req: InboundRequest,
        Res: ResponseSink,
        H: FnOnce(&Req) -> Result<Reply<T>, Interrupt<E>>,
    {
        let log = RequestLog::new(request.request_id());
        log.phase(Phase::Routing);

        if let Some(redirect) = self.canonical_redirect(request, &log) {
            return Ok(Self::issue(response, redirect, &log));
        }

        log.phase(Phase::Dispatched);
        self.resolve(handler(request), response, &log)
    }

    /// Pre-handler step: redirects to the canonical path when needed.
    ///
    /// Returns the issued redirect, or `None` if the handler should run.
    pub fn canonicalize<Req, Res>(&self, request: &Req, response: &mut Res) -> Option<Redirect>
    where
        Req: InboundRequest,
        Res: ResponseSink,
    {
        let log = RequestLog::new(request.request_id());
        let redirect = self.canonical_redirect(request, &log)?;
        log.redirect(&redirect);
        response.redirect(&redirect);
        Some(redirect)
    }

    /// Post-handler step: converts a handler result into an outcome.
    ///
    /// # Errors
    ///
    /// Returns the handler's own failure unchanged.
    pub fn resolve<T, E, Res>(
        &self,
        result: Result<Reply<T>, Interrupt<E>>,
        response: &mut Res,
        log: &RequestLog<'_>,
    ) -> Result<Outcome<T>, E>
    where
        Res: ResponseSink,
    {
        match result {
            Ok(Reply::Render(body)) => {
                log.phase(Phase::Normal);
                Ok(Outcome::Rendered(body))
            }
            Ok(Reply::Redirect(redirect)) | Err(Interrupt::Redirect(redirect)) => {
                Ok(Self::issue(response, redirect, log))
            }
            Err(Interrupt::Failed(error)) => Err(error),
        }
    }

    fn canonical_redirect<Req: InboundRequest>(
        &self,
        request: &Req,
        log: &RequestLog<'_>,
    ) -> Option<Redirect> {
        let rule = self.canonical.as_ref()?;
        log.phase(Phase::Canonicalizing);
        rule.redirect_for(request)
    }

    fn issue<T, Res: ResponseSink>(
        response: &mut Res,
        redirect: Redirect,
        log: &RequestLog<'_>,
    ) -> Outcome<T> {
        let redirect = if redirect.has_redirect_status() {
            redirect
        } else {
            log.debug(format_args!(
                "redirect status {} is not 3xx; using {}",
                redirect.status_code(),
                DEFAULT_REDIRECT_STATUS
            ));
            Redirect::new(redirect.url())
        };

        log.phase(Phase::Redirecting);
        log.redirect(&redirect);
        response.redirect(&redirect);
        Outcome::Redirected(redirect)
    }
}
