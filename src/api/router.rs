//! Route tables and the request multiplexer.
//!
//! Each resource exposes its endpoints as a list of [`Route`]s. [`compose`]
//! concatenates the lists and [`Mux`] installs them on an axum router, with
//! the middleware chain applied to every handler.

use std::collections::{HashMap, HashSet};
use std::path::Path as FsPath;

use axum::extract::{Path, Request};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use thiserror::Error;
use tower_http::services::ServeDir;

use super::httpkit::{BoxHandler, Handler, HttpRequest, Reply};
use super::middleware::Chain;

/// One endpoint: method, path pattern and handler.
///
/// Patterns name parameters in braces (`/cards/{id}`); a trailing `*`
/// matches the rest of the path.
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: String,
    pub handler: BoxHandler,
}

impl Route {
    pub fn new(method: Method, pattern: impl Into<String>, handler: impl Handler) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            handler: std::sync::Arc::new(handler),
        }
    }

    pub fn get(pattern: impl Into<String>, handler: impl Handler) -> Self {
        Self::new(Method::GET, pattern, handler)
    }

    pub fn post(pattern: impl Into<String>, handler: impl Handler) -> Self {
        Self::new(Method::POST, pattern, handler)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// A resource's endpoints.
pub trait Routes: Send + Sync {
    fn routes(&self) -> Vec<Route>;
}

/// Concatenate route lists in order.
pub fn compose(routers: &[&dyn Routes]) -> Vec<Route> {
    routers.iter().flat_map(|r| r.routes()).collect()
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route {method} {pattern} registered twice")]
    Conflict { method: Method, pattern: String },

    #[error("unsupported method {0}")]
    UnsupportedMethod(Method),
}

/// Registers routes and rejects duplicate `(method, pattern)` pairs.
#[derive(Default)]
pub struct Mux {
    router: Router,
    registered: HashSet<(Method, String)>,
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install one handler, wrapped by `chain`.
    pub fn handle(&mut self, route: Route, chain: &Chain) -> Result<(), RouteError> {
        let Route {
            method,
            pattern,
            handler,
        } = route;

        let key = (method.clone(), pattern.clone());
        if self.registered.contains(&key) {
            return Err(RouteError::Conflict { method, pattern });
        }
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| RouteError::UnsupportedMethod(method.clone()))?;

        let handler = chain.apply(&method, &pattern, handler);
        let path = axum_path(&pattern);
        self.route(&path, on(filter, adapter(handler)));
        self.registered.insert(key);
        Ok(())
    }

    /// Install every route with the same chain.
    pub fn install(&mut self, routes: Vec<Route>, chain: &Chain) -> Result<(), RouteError> {
        for route in routes {
            self.handle(route, chain)?;
        }
        Ok(())
    }

    /// Serve files under `dir` at `prefix`.
    pub fn mount_static(&mut self, prefix: &str, dir: impl AsRef<FsPath>) {
        let router = std::mem::take(&mut self.router);
        self.router = router.nest_service(prefix, ServeDir::new(dir));
    }

    /// Install a plain axum endpoint that bypasses the middleware chain.
    pub fn raw_route(&mut self, path: &str, method_router: MethodRouter) {
        self.route(path, method_router);
    }

    fn route(&mut self, path: &str, method_router: MethodRouter) {
        let router = std::mem::take(&mut self.router);
        self.router = router.route(path, method_router);
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Bridge a handler into an axum handler.
fn adapter(
    handler: BoxHandler,
) -> impl Fn(Option<Path<HashMap<String, String>>>, Request) -> futures::future::BoxFuture<'static, Response>
       + Clone
       + Send
       + Sync
       + 'static {
    move |params: Option<Path<HashMap<String, String>>>, req: Request| {
        let handler = handler.clone();
        Box::pin(async move {
            let params = params.map(|Path(p)| p).unwrap_or_default();
            match handler.serve(HttpRequest::new(req, params)).await {
                Ok(reply) => reply.into_response(),
                Err(err) => {
                    tracing::error!(error = %err, "unhandled handler error");
                    Reply::from_handler_error(err).into_response()
                }
            }
        })
    }
}

/// Translate `{name}` segments to `:name` and a trailing `*` to `*rest`.
pub fn axum_path(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if let Some(name) = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                format!(":{}", name)
            } else if segment == "*" {
                "*rest".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
