use std::collections::HashMap;

use http::{HeaderMap, HeaderName, HeaderValue, Method};

use crate::Result;

/// Per-request state threaded through the middleware pipeline.
///
/// `path` is rewritten as nested routers consume prefixes; `base_path` holds
/// the portion already consumed and the original path is kept as first seen.
/// The dispatch engine restores `path`, `base_path` and `params` to their
/// entry values before handing the context back, so callers never observe a
/// router's internal rewrites.
#[derive(Debug)]
pub struct Context {
    pub method: Method,
    pub path: String,
    pub base_path: String,
    pub params: HashMap<String, String>,
    pub body: Option<String>,
    original_path: Option<String>,
    allowed_methods: Option<Vec<Method>>,
    headers: HeaderMap,
}

impl Context {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            base_path: String::new(),
            params: HashMap::new(),
            body: None,
            original_path: None,
            allowed_methods: None,
            headers: HeaderMap::new(),
        }
    }

    /// The path as it entered the outermost dispatch.
    pub fn original_path(&self) -> &str {
        self.original_path.as_deref().unwrap_or(&self.path)
    }

    pub(crate) fn capture_original_path(&mut self) {
        if self.original_path.is_none() {
            self.original_path = Some(self.path.clone());
        }
    }

    /// Methods collected for the `Allow` header, in first-seen order.
    /// Populated only while an `OPTIONS` request traverses the stack.
    pub fn allowed_methods(&self) -> Option<&[Method]> {
        self.allowed_methods.as_deref()
    }

    pub(crate) fn ensure_allowed_methods(&mut self) {
        self.allowed_methods.get_or_insert_with(Vec::new);
    }

    /// Record a method as allowed for the current request.
    pub fn allow(&mut self, method: Method) {
        let methods = self.allowed_methods.get_or_insert_with(Vec::new);
        if !methods.contains(&method) {
            methods.push(method);
        }
    }

    pub(crate) fn allow_header(&self) -> Option<String> {
        self.allowed_methods
            .as_ref()
            .filter(|methods| !methods.is_empty())
            .map(|methods| {
                methods
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(",")
            })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header(&self, name: HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn set_header<V: AsRef<str>>(&mut self, name: HeaderName, value: V) -> Result<()> {
        let value = HeaderValue::from_str(value.as_ref())?;
        self.headers.insert(name, value);
        Ok(())
    }
}
