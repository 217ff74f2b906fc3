//! Request logging.

use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;

use super::Middleware;
use crate::api::httpkit::{BoxHandler, HttpRequest, Outcome};

/// Logs every request with its final status, size and latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogging;

impl Middleware for RequestLogging {
    fn wrap(&self, method: &Method, pattern: &str, next: BoxHandler) -> BoxHandler {
        let method = method.clone();
        let pattern = pattern.to_string();

        Arc::new(move |req: HttpRequest| {
            let next = next.clone();
            let method = method.clone();
            let pattern = pattern.clone();

            async move {
                let url = req.uri().to_string();
                let start = Instant::now();
                let result = next.serve(req).await;
                let took = start.elapsed();
                let outcome = Outcome::of(&result);

                match outcome.error {
                    Some(err) => tracing::error!(
                        method = %method,
                        pattern = %pattern,
                        url = %url,
                        status = outcome.status.as_u16(),
                        bytes_written = outcome.bytes_written,
                        took = ?took,
                        error = %err,
                        "request failed"
                    ),
                    None => tracing::info!(
                        method = %method,
                        pattern = %pattern,
                        url = %url,
                        status = outcome.status.as_u16(),
                        bytes_written = outcome.bytes_written,
                        took = ?took,
                        "request succeeded"
                    ),
                }

                result
            }
        })
    }
}
