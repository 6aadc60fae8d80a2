mod dispatch;
mod layer;
mod route;

pub use layer::{Endpoint, Layer};
pub use route::Route;

use std::sync::Arc;

use async_trait::async_trait;
use http::{header, Method};
use tracing::debug;

use crate::{
    pattern::{MatchOptions, Pattern},
    Context, Middleware, Next, Result, Service,
};

use self::layer::LayerKind;

/// Options governing pattern compilation and parameter merging. Immutable
/// after construction.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Treat trailing slashes in mount patterns as significant.
    pub strict: bool,
    /// Match paths case-sensitively.
    pub sensitive: bool,
    /// Merge a matched layer's params over the parent's instead of replacing
    /// them.
    pub merge_params: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            strict: false,
            sensitive: false,
            merge_params: true,
        }
    }
}

/// Anything registrable as a handler list: a single middleware, a sub-router,
/// a shared [`Service`], endpoints, or arbitrarily nested tuples of the
/// above. Tuples flatten in order.
pub trait Handlers {
    fn append_to(self, stack: &mut Vec<Endpoint>);
}

impl<M: Middleware + 'static> Handlers for M {
    fn append_to(self, stack: &mut Vec<Endpoint>) {
        stack.push(Endpoint::Plain(Arc::new(self)));
    }
}

impl Handlers for Service {
    fn append_to(self, stack: &mut Vec<Endpoint>) {
        stack.push(Endpoint::Plain(self));
    }
}

impl Handlers for Router {
    fn append_to(self, stack: &mut Vec<Endpoint>) {
        stack.push(Endpoint::Router(Arc::new(self)));
    }
}

impl Handlers for Arc<Router> {
    fn append_to(self, stack: &mut Vec<Endpoint>) {
        stack.push(Endpoint::Router(self));
    }
}

impl Handlers for Endpoint {
    fn append_to(self, stack: &mut Vec<Endpoint>) {
        stack.push(self);
    }
}

impl Handlers for Vec<Endpoint> {
    fn append_to(mut self, stack: &mut Vec<Endpoint>) {
        stack.append(&mut self);
    }
}

impl Handlers for () {
    fn append_to(self, _stack: &mut Vec<Endpoint>) {}
}

macro_rules! handler_tuples {
    ($(($($name:ident),+)),+ $(,)?) => {
        $(
            #[allow(non_snake_case)]
            impl<$($name: Handlers),+> Handlers for ($($name,)+) {
                fn append_to(self, stack: &mut Vec<Endpoint>) {
                    let ($($name,)+) = self;
                    $($name.append_to(stack);)+
                }
            }
        )+
    };
}

handler_tuples!((A, B), (A, B, C), (A, B, C, D), (A, B, C, D, E), (A, B, C, D, E, F));

macro_rules! router_verbs {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Sugar for `route(path)?.", stringify!($name), "(handlers)`.")]
            pub fn $name<H: Handlers>(&mut self, path: &str, handlers: H) -> Result<&mut Self> {
                self.route(path)?.$name(handlers)?;
                Ok(self)
            }
        )*
    };
}

/// An ordered stack of path-scoped layers with first-match-wins dispatch.
///
/// Routers nest: mounting one router on another strips the matched prefix
/// before delegating and restores the context afterwards.
pub struct Router {
    pub(crate) options: RouterOptions,
    pub(crate) stack: Vec<Layer>,
}

impl Router {
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    pub fn with_options(options: RouterOptions) -> Self {
        let mut router = Self {
            options,
            stack: Vec::new(),
        };
        // automatic OPTIONS handling wraps the rest of the stack
        router.stack.push(Layer::root(LayerKind::Endpoint(Endpoint::Plain(
            Arc::new(AllowedMethods),
        ))));
        router
    }

    /// Layers in registration order. The first layer is always the automatic
    /// `OPTIONS` handler.
    pub fn stack(&self) -> &[Layer] {
        &self.stack
    }

    /// Register middleware under the root prefix, matching every path.
    pub fn middleware<H: Handlers>(&mut self, handlers: H) -> Result<&mut Self> {
        self.mount("/", handlers)
    }

    /// Register middleware under a path prefix. The pattern need not consume
    /// the whole path; a mounted sub-router sees the request with the
    /// matched prefix stripped.
    pub fn mount<H: Handlers>(&mut self, path: &str, handlers: H) -> Result<&mut Self> {
        let endpoint = Endpoint::from_handlers(handlers)?;
        let pattern = Pattern::compile(path, self.match_options(false))?;
        debug!(path, "mounting middleware");
        self.stack
            .push(Layer::new(path, pattern, LayerKind::Endpoint(endpoint)));
        Ok(self)
    }

    /// Create a route at `path` and return it for method binding. The
    /// pattern must consume the whole remaining path to match.
    pub fn route(&mut self, path: &str) -> Result<&mut Route> {
        let pattern = Pattern::compile(path, self.match_options(true))?;
        debug!(path, "mounting route");
        self.stack
            .push(Layer::new(path, pattern, LayerKind::Route(Route::new(path))));
        let route = self
            .stack
            .last_mut()
            .and_then(Layer::route_mut)
            .expect("route layer pushed above");
        Ok(route)
    }

    router_verbs! {
        get,
        post,
        put,
        delete,
        del,
        patch,
        head,
        options,
        trace,
        connect,
        all,
    }

    /// Erase the router into a plain [`Service`] for use in host pipelines
    /// or handler chains.
    pub fn into_service(self) -> Service {
        Arc::new(Mounted(Arc::new(self)))
    }

    fn match_options(&self, end: bool) -> MatchOptions {
        MatchOptions {
            end,
            strict: self.options.strict,
            sensitive: self.options.sensitive,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

struct Mounted(Arc<Router>);

#[async_trait]
impl Middleware for Mounted {
    async fn run<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        self.0.dispatch(ctx, next).await
    }
}

/// First layer of every router: makes sure the allowed-methods set exists
/// while an `OPTIONS` request traverses the stack, then writes the `Allow`
/// header and body from whatever the traversal collected.
struct AllowedMethods;

#[async_trait]
impl Middleware for AllowedMethods {
    async fn run<'a>(&'a self, mut ctx: Context, next: Next<'a>) -> Result<Context> {
        if ctx.method == Method::OPTIONS {
            ctx.ensure_allowed_methods();
        }
        let mut ctx = next.run(ctx).await?;
        if ctx.method == Method::OPTIONS {
            if let Some(allow) = ctx.allow_header() {
                ctx.set_header(header::ALLOW, &allow)?;
                ctx.body = Some(allow);
            }
        }
        Ok(ctx)
    }
}
