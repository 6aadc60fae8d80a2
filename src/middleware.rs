use std::sync::Arc;

use async_trait::async_trait;

use crate::{Context, Next, Result};

/// A middleware processes the request context and decides whether the rest
/// of the pipeline runs: `next.run(ctx)` resumes it, returning without
/// running `next` terminates the request. Errors propagate to the caller of
/// the pipeline unmodified.
///
/// The receiver and the continuation share the `'a` lifetime so composing
/// middleware (chains, mounted routers) can capture itself inside the
/// continuation it hands downstream.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn run<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context>;
}

/// A shared, type-erased middleware.
pub type Service = Arc<dyn Middleware>;
