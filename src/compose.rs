use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::{
    router::{Endpoint, Handlers},
    Context, Middleware, Next, Result, Service,
};

/// Compose a handler list into a single sequential middleware.
///
/// Each element must run its continuation for the following one to execute;
/// the final continuation is the caller's `next`. An empty list composes to
/// a middleware that only runs `next`.
pub fn compose<H: Handlers>(handlers: H) -> Service {
    let mut endpoints = Vec::new();
    handlers.append_to(&mut endpoints);
    Arc::new(Chain::new(endpoints))
}

/// Sequential chain over tagged endpoints.
pub struct Chain {
    stack: Vec<Endpoint>,
}

impl Chain {
    pub fn new(stack: Vec<Endpoint>) -> Self {
        Self { stack }
    }

    fn run_from<'a>(
        &'a self,
        index: usize,
        ctx: Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Context>> {
        Box::pin(async move {
            match self.stack.get(index) {
                Some(endpoint) => {
                    let rest = Next::new(move |ctx| self.run_from(index + 1, ctx, next));
                    endpoint.call(ctx, rest).await
                }
                None => next.run(ctx).await,
            }
        })
    }
}

#[async_trait]
impl Middleware for Chain {
    async fn run<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        self.run_from(0, ctx, next).await
    }
}
