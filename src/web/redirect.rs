//! Redirect signals.
//!
//! A handler asks for a redirect in one of two equivalent ways:
//! - returning [`Reply::Redirect`]
//! - propagating an [`Interrupt::Redirect`] through `?` from anywhere in its
//!   call graph
//!
//! Only the [`Interceptor`](super::Interceptor) unwraps either form.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Status used when a redirect does not name one.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// Statuses that may be written as a redirect.
pub const REDIRECT_STATUSES: Range<u16> = 300..400;

/// Target and status of a redirect.
///
/// Serializes as `{ "url": ..., "statusCode": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    url: String,
    #[serde(default = "default_status")]
    status_code: u16,
}

fn default_status() -> u16 {
    DEFAULT_REDIRECT_STATUS
}

impl Redirect {
    /// A `302 Found` redirect to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_status(url, DEFAULT_REDIRECT_STATUS)
    }

    /// A redirect to `url` with an explicit status.
    pub fn with_status(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code,
        }
    }

    /// A `301 Moved Permanently` redirect.
    pub fn permanent(url: impl Into<String>) -> Self {
        Self::with_status(url, 301)
    }

    /// A `303 See Other` redirect, used after a successful form post.
    pub fn see_other(url: impl Into<String>) -> Self {
        Self::with_status(url, 303)
    }

    /// A `307 Temporary Redirect` that preserves the method.
    pub fn temporary(url: impl Into<String>) -> Self {
        Self::with_status(url, 307)
    }

    /// Value for the `Location` header.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns true if the status is a 3xx redirect status.
    pub fn has_redirect_status(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.status_code)
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status_code, self.url)
    }
}

/// What a handler produced: a view model to render, or a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// Render `T` normally.
    Render(T),
    /// Redirect instead of rendering.
    Redirect(Redirect),
}

impl<T> From<Redirect> for Reply<T> {
    fn from(redirect: Redirect) -> Self {
        Reply::Redirect(redirect)
    }
}

/// Error channel of a handler.
///
/// `Redirect` is control flow raised from deep in the call graph; `Failed`
/// carries a genuine error that the interceptor hands back untouched.
///
/// # Examples
///
/// ```
/// use case_pipeline::web::{Interrupt, Redirect, Reply};
///
/// fn require_consent(given: bool) -> Result<(), Redirect> {
///     if given { Ok(()) } else { Err(Redirect::new("/consent")) }
/// }
///
/// fn handler(given: bool) -> Result<Reply<&'static str>, Interrupt<std::io::Error>> {
///     require_consent(given)?;
///     Ok(Reply::Render("overview"))
/// }
///
/// assert!(matches!(handler(false), Err(Interrupt::Redirect(_))));
/// ```
#[derive(Debug)]
pub enum Interrupt<E> {
    /// Stop and redirect.
    Redirect(Redirect),
    /// The handler failed.
    Failed(E),
}

impl<E> From<Redirect> for Interrupt<E> {
    fn from(redirect: Redirect) -> Self {
        Interrupt::Redirect(redirect)
    }
}
