//! Middleware chain.
//!
//! A middleware turns `(method, pattern, next)` into a new handler. A
//! [`Chain`] applies its middleware in reverse registration order, so the
//! first one registered is the outermost wrapper.

mod logging;
mod metrics;
mod status;

use std::sync::Arc;

use axum::http::Method;

use super::httpkit::BoxHandler;

pub use self::logging::RequestLogging;
pub use self::metrics::{install_recorder, RequestMetrics};
pub use self::status::StatusTranslation;

pub trait Middleware: Send + Sync {
    fn wrap(&self, method: &Method, pattern: &str, next: BoxHandler) -> BoxHandler;
}

impl<F> Middleware for F
where
    F: Fn(&Method, &str, BoxHandler) -> BoxHandler + Send + Sync,
{
    fn wrap(&self, method: &Method, pattern: &str, next: BoxHandler) -> BoxHandler {
        self(method, pattern, next)
    }
}

/// Ordered list of middleware.
#[derive(Clone, Default)]
pub struct Chain {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware inside the ones already registered.
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Wrap `handler`; the first registered middleware ends up outermost.
    pub fn apply(&self, method: &Method, pattern: &str, handler: BoxHandler) -> BoxHandler {
        self.middleware
            .iter()
            .rev()
            .fold(handler, |next, middleware| middleware.wrap(method, pattern, next))
    }
}

/// Logging outermost, then metrics, then status translation next to the
/// handler.
pub fn default_chain() -> Chain {
    Chain::new()
        .with(RequestLogging)
        .with(RequestMetrics)
        .with(StatusTranslation)
}
