//! Static route table.
//!
//! Routes map an exact request path to a [`Handler`] that produces the
//! complete serialized response. The table is filled during startup through
//! `&mut self` and then frozen behind an `Arc`, so concurrent sessions only
//! ever read it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

/// A zero-argument capability that yields a serialized HTTP response.
///
/// Implemented for any `Fn() -> Bytes` closure, which is how routes bind
/// the shared [`FileHandler`](crate::http::file::FileHandler) and
/// [`ResponseBuilder`](crate::http::response::ResponseBuilder) at
/// registration time.
pub trait Handler: Send + Sync {
    fn call(&self) -> Bytes;
}

impl<F> Handler for F
where
    F: Fn() -> Bytes + Send + Sync,
{
    fn call(&self) -> Bytes {
        self()
    }
}

#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `path`, replacing any previous handler.
    pub fn add_route<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        let path = path.into();
        if self.routes.insert(path.clone(), Arc::new(handler)).is_some() {
            tracing::debug!(path = %path, "Route handler replaced");
        }
    }

    /// Looks up `path` exactly and runs its handler.
    ///
    /// Returns empty bytes when no route matches. Callers treat an empty
    /// result as "not found", including when a registered handler itself
    /// returned nothing.
    pub fn handle_request(&self, path: &str) -> Bytes {
        match self.routes.get(path) {
            Some(handler) => handler.call(),
            None => Bytes::new(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        f.debug_struct("Router").field("routes", &paths).finish()
    }
}
