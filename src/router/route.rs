use http::Method;

use crate::{Context, Next, Result};

use super::{layer::Endpoint, Handlers};

macro_rules! route_verbs {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            #[doc = concat!("Bind a handler chain to `", stringify!($method), "`.")]
            pub fn $name<H: Handlers>(&mut self, handlers: H) -> Result<&mut Self> {
                self.bind(Method::$method, handlers)
            }
        )*
    };
}

/// A path's method table: insertion-ordered method bindings plus an optional
/// any-method handler.
pub struct Route {
    path: String,
    table: Vec<(Method, Endpoint)>,
    any: Option<Endpoint>,
}

impl Route {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            table: Vec::new(),
            any: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bind a handler chain to a method. Rebinding replaces the handler but
    /// keeps the method's position in the `Allow` ordering.
    pub fn bind<H: Handlers>(&mut self, method: Method, handlers: H) -> Result<&mut Self> {
        let endpoint = Endpoint::from_handlers(handlers)?;
        match self.table.iter().position(|(bound, _)| *bound == method) {
            Some(index) => self.table[index].1 = endpoint,
            None => self.table.push((method, endpoint)),
        }
        Ok(self)
    }

    route_verbs! {
        get => GET,
        post => POST,
        put => PUT,
        delete => DELETE,
        patch => PATCH,
        head => HEAD,
        options => OPTIONS,
        trace => TRACE,
        connect => CONNECT,
    }

    /// Alias of [`Route::delete`].
    pub fn del<H: Handlers>(&mut self, handlers: H) -> Result<&mut Self> {
        self.delete(handlers)
    }

    /// Bind a handler chain to every method.
    pub fn all<H: Handlers>(&mut self, handlers: H) -> Result<&mut Self> {
        self.any = Some(Endpoint::from_handlers(handlers)?);
        Ok(self)
    }

    /// Whether a request with `method` would be handled here.
    pub fn handles_method(&self, method: &Method) -> bool {
        self.any.is_some() || self.table.iter().any(|(bound, _)| bound == method)
    }

    /// Explicitly bound methods in registration order; the source of the
    /// `Allow` union.
    pub fn allowed(&self) -> Vec<Method> {
        self.table.iter().map(|(method, _)| method.clone()).collect()
    }

    fn handler(&self, method: &Method) -> Option<&Endpoint> {
        self.table
            .iter()
            .find(|(bound, _)| bound == method)
            .map(|(_, endpoint)| endpoint)
            .or(self.any.as_ref())
    }

    /// Invoke the binding for the context's method, or fall through to
    /// `next` so the router's method-mismatch bookkeeping applies.
    pub async fn dispatch<'a>(&'a self, ctx: Context, next: Next<'a>) -> Result<Context> {
        match self.handler(&ctx.method) {
            Some(endpoint) => endpoint.call(ctx, next).await,
            None => next.run(ctx).await,
        }
    }
}
