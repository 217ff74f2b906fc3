//! Error-to-status translation.

use std::sync::Arc;

use axum::http::Method;

use super::Middleware;
use crate::api::httpkit::{BoxHandler, HttpRequest, Reply};

/// Renders any handler error as a JSON error reply. Register it innermost so
/// it sees the handler's raw result.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTranslation;

impl Middleware for StatusTranslation {
    fn wrap(&self, _method: &Method, _pattern: &str, next: BoxHandler) -> BoxHandler {
        Arc::new(move |req: HttpRequest| {
            let next = next.clone();
            async move {
                match next.serve(req).await {
                    Ok(reply) => Ok(reply),
                    Err(err) => Ok(Reply::from_handler_error(err)),
                }
            }
        })
    }
}
