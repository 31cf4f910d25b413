//! Web framework integration surface.
//!
//! This module is the boundary between an HTTP framework and the pipeline. It
//! handles:
//! - Reading path, query, route parameters and body from a framework request
//! - Redirecting non-canonical case references before any handler runs
//! - Turning returned or raised redirects into a single response write
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: This module contains no framework-specific code.
//!    It defines interfaces ([`InboundRequest`], [`ResponseSink`]) that
//!    framework-specific code can implement.
//!
//! 2. **Redirects Are Values**: A handler returns [`Reply::Redirect`] or
//!    propagates [`Interrupt::Redirect`] with `?`. Nothing unwinds.
//!
//! 3. **Failures Pass Through**: Only redirects are intercepted. A handler's
//!    own error reaches the caller unchanged.
//!
//! # Integration Model
//!
//! Framework-specific glue should:
//! 1. Implement [`InboundRequest`] for the framework request, or build a
//!    [`RequestAdapter`] from it
//! 2. Implement [`ResponseSink`] for the framework response
//! 3. Build one [`Interceptor`] at startup from a
//!    [`PipelineConfig`](crate::PipelineConfig)
//! 4. Wrap each handler call with [`Interceptor::intercept`] and render only
//!    [`Outcome::Rendered`]
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let interceptor = Interceptor::from_config(&PipelineConfig::from_env()?);
//!
//! let request = RequestAdapter::from_http_request(http_req);
//! match interceptor.intercept(&request, &mut http_res, handle_case_overview)? {
//!     Outcome::Rendered(view) => render("case/overview", &view),
//!     Outcome::Redirected(_) => {}
//! }
//! ```

mod adapter;
mod canonical;
pub mod example_handler;
mod extract;
mod interceptor;
mod redirect;
mod response;

pub use adapter::RequestAdapter;
pub use canonical::CanonicalReference;
pub use extract::InboundRequest;
pub use interceptor::{Interceptor, Outcome, Phase};
pub use redirect::{Interrupt, Redirect, Reply, DEFAULT_REDIRECT_STATUS, REDIRECT_STATUSES};
pub use response::{RecordedResponse, ResponseSink};
