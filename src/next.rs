use futures::future::BoxFuture;

use crate::{Context, Result};

/// Continuation handed to every handler.
///
/// Running it resumes the pipeline behind the current handler and yields the
/// context back once that part is done; dropping it without running
/// short-circuits the request. It is consumed either way, so a handler
/// resumes the pipeline at most once.
pub struct Next<'a> {
    inner: Box<dyn FnOnce(Context) -> BoxFuture<'a, Result<Context>> + Send + 'a>,
}

impl<'a> Next<'a> {
    pub fn new<F>(resume: F) -> Self
    where
        F: FnOnce(Context) -> BoxFuture<'a, Result<Context>> + Send + 'a,
    {
        Self {
            inner: Box::new(resume),
        }
    }

    /// Terminal continuation: hands the context back untouched.
    pub fn end() -> Self {
        Self::new(|ctx| {
            let done: BoxFuture<'a, Result<Context>> = Box::pin(async move { Ok(ctx) });
            done
        })
    }

    pub async fn run(self, ctx: Context) -> Result<Context> {
        (self.inner)(ctx).await
    }
}
