use std::sync::Arc;

use crate::{
    compose::Chain,
    pattern::{Pattern, PatternMatch},
    Context, Error, Middleware, Next, Result, Service,
};

use super::{Handlers, Route, Router};

/// A handler as stored in the stack: plain middleware or a nested router.
///
/// The tag is what the dispatch engine matches on to pick the invocation
/// path; an erased router ([`Router::into_service`]) behaves like plain
/// middleware while a directly mounted one keeps its identity.
pub enum Endpoint {
    Plain(Service),
    Router(Arc<Router>),
}

impl Endpoint {
    pub fn plain<M: Middleware + 'static>(middleware: M) -> Self {
        Self::Plain(Arc::new(middleware))
    }

    pub fn router(router: Router) -> Self {
        Self::Router(Arc::new(router))
    }

    /// Flatten `handlers` into a single endpoint, composing multiples into a
    /// chain. A lone handler is stored as-is so a sub-router keeps its tag.
    pub(crate) fn from_handlers<H: Handlers>(handlers: H) -> Result<Self> {
        let mut endpoints = Vec::new();
        handlers.append_to(&mut endpoints);
        match endpoints.len() {
            0 => Err(Error::configuration("expected at least one handler")),
            1 => Ok(endpoints.remove(0)),
            _ => Ok(Self::Plain(Arc::new(Chain::new(endpoints)))),
        }
    }

    pub(crate) async fn call<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        match self {
            Self::Plain(middleware) => middleware.run(ctx, next).await,
            Self::Router(router) => router.dispatch(ctx, next).await,
        }
    }
}

/// One stack entry: a compiled mount pattern bound to a handler, optionally
/// carrying the method table that makes it a route.
pub struct Layer {
    path: String,
    pattern: Pattern,
    kind: LayerKind,
}

pub(crate) enum LayerKind {
    Endpoint(Endpoint),
    Route(Route),
}

impl Layer {
    pub(crate) fn new(path: &str, pattern: Pattern, kind: LayerKind) -> Self {
        Self {
            path: path.to_string(),
            pattern,
            kind,
        }
    }

    /// The universal prefix layer (`/`, matching every path).
    pub(crate) fn root(kind: LayerKind) -> Self {
        Self {
            path: "/".to_string(),
            pattern: Pattern::root(),
            kind,
        }
    }

    /// The original mount pattern.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The method table, present only for layers created by
    /// [`Router::route`]. Its presence is what makes a layer method-aware.
    pub fn route(&self) -> Option<&Route> {
        match &self.kind {
            LayerKind::Route(route) => Some(route),
            LayerKind::Endpoint(_) => None,
        }
    }

    pub(crate) fn route_mut(&mut self) -> Option<&mut Route> {
        match &mut self.kind {
            LayerKind::Route(route) => Some(route),
            LayerKind::Endpoint(_) => None,
        }
    }

    pub fn matches(&self, path: &str) -> Option<PatternMatch> {
        self.pattern.matches(path)
    }

    pub(crate) async fn call<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        match &self.kind {
            LayerKind::Endpoint(endpoint) => endpoint.call(ctx, next).await,
            LayerKind::Route(route) => route.dispatch(ctx, next).await,
        }
    }
}
