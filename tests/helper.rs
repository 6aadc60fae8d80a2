#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Method;
use junction::{Context, Middleware, Next, Result};

pub fn request(method: Method, path: &str) -> Context {
    Context::new(method, path)
}

/// Outer `next` probe: flips the flag when the router falls through.
pub fn outer_next<'a>(reached: Arc<AtomicBool>) -> Next<'a> {
    Next::new(move |ctx| {
        let done: BoxFuture<'a, Result<Context>> = Box::pin(async move {
            reached.store(true, Ordering::SeqCst);
            Ok(ctx)
        });
        done
    })
}

/// Writes a response body and terminates the chain.
pub struct Respond(pub &'static str);

#[async_trait]
impl Middleware for Respond {
    async fn run<'a>(&'a self, mut ctx: Context, _next: Next<'a>) -> Result<Context> {
        ctx.body = Some(self.0.to_string());
        Ok(ctx)
    }
}

/// Records a tag, then falls through.
pub struct Record {
    pub tag: &'static str,
    pub log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Middleware for Record {
    async fn run<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        self.log.lock().unwrap().push(self.tag);
        next.run(ctx).await
    }
}

/// Calls straight through to the rest of the pipeline.
pub struct PassThrough;

#[async_trait]
impl Middleware for PassThrough {
    async fn run<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        next.run(ctx).await
    }
}

/// Fails the request.
pub struct Explode;

#[async_trait]
impl Middleware for Explode {
    async fn run<'a>(&'a self, _ctx: Context, _next: Next<'a>) -> Result<Context> {
        Err(anyhow::anyhow!("boom").into())
    }
}

/// The path context visible inside a handler.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub base_path: String,
    pub params: HashMap<String, String>,
}

/// Captures the path context at handler time, then responds.
#[derive(Clone, Default)]
pub struct Capture {
    seen: Arc<Mutex<Option<Seen>>>,
}

#[async_trait]
impl Middleware for Capture {
    async fn run<'a>(&'a self, mut ctx: Context, _next: Next<'a>) -> Result<Context> {
        *self.seen.lock().unwrap() = Some(Seen {
            path: ctx.path.clone(),
            base_path: ctx.base_path.clone(),
            params: ctx.params.clone(),
        });
        ctx.body = Some("captured".to_string());
        Ok(ctx)
    }
}

impl Capture {
    pub fn seen(&self) -> Seen {
        self.seen
            .lock()
            .unwrap()
            .clone()
            .expect("handler was not reached")
    }

    pub fn reached(&self) -> bool {
        self.seen.lock().unwrap().is_some()
    }
}
