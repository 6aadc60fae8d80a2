//! Nested, composable request router.
//!
//! A [`Router`] is an ordered stack of path-scoped layers, scanned in
//! registration order with the first acceptable layer winning. Plain
//! middleware is accepted on a path match alone while a route also requires
//! its method table to cover the request method. A mounted sub-router sees
//! the request with the matched prefix stripped and the context is restored
//! once it returns. Every handler receives a [`Next`] continuation; running
//! it resumes the scan behind the handler, dropping it terminates the
//! request. `OPTIONS` requests are answered automatically with the union of
//! methods bound on every matching route.
//!
//! # Example usage
//!
//! ```
//! use async_trait::async_trait;
//! use http::Method;
//! use junction::{Context, Middleware, Next, Result, Router};
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Middleware for Hello {
//!     async fn run<'a>(&'a self, mut ctx: Context, _next: Next<'a>) -> Result<Context> {
//!         ctx.body = Some(format!("hello {}", ctx.params["name"]));
//!         Ok(ctx)
//!     }
//! }
//!
//! let mut users = Router::new();
//! users.get("/:name", Hello).unwrap();
//!
//! let mut app = Router::new();
//! app.mount("/users", users).unwrap();
//!
//! let ctx = Context::new(Method::GET, "/users/mia");
//! let ctx = futures::executor::block_on(app.dispatch(ctx, Next::end())).unwrap();
//! assert_eq!(ctx.body.as_deref(), Some("hello mia"));
//! ```

use std::fmt::Display;

pub(crate) mod compose;
pub(crate) mod ctx;
pub(crate) mod middleware;
pub(crate) mod next;
pub(crate) mod pattern;
pub(crate) mod router;

pub use compose::{compose, Chain};
pub use ctx::Context;
pub use middleware::{Middleware, Service};
pub use next::Next;
pub use pattern::{MatchOptions, Pattern, PatternMatch};
pub use router::{Endpoint, Handlers, Layer, Route, Router, RouterOptions};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Invalid registration: empty handler list or a malformed mount pattern.
    /// Raised synchronously at registration time, never during dispatch.
    Configuration(String),
    /// A header value could not be encoded.
    Header(http::header::InvalidHeaderValue),
    /// A handler failed; carried through the dispatch chain unmodified.
    Handler(anyhow::Error),
}

impl Error {
    pub fn configuration<S: AsRef<str>>(message: S) -> Self {
        Self::Configuration(message.as_ref().to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Self::Handler(error)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(error: http::header::InvalidHeaderValue) -> Self {
        Self::Header(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(message) => message.fmt(f),
            Self::Header(error) => {
                "invalid header value: ".fmt(f)?;
                error.fmt(f)
            }
            Self::Handler(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(_) => None,
            Self::Header(error) => Some(error),
            Self::Handler(error) => Some(error.as_ref()),
        }
    }
}
