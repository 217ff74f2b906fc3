//! Small HTTP toolkit shared by every endpoint.
//!
//! Handlers return a [`HandlerResult`] instead of writing errors. Middleware
//! wraps handlers, and the status translation middleware is the single place
//! an error becomes bytes on the wire.

mod error;
mod handler;
mod reply;
mod request;

use axum::http::StatusCode;

pub use error::{ApiError, BoxError, ErrorBody, HandlerError};
pub use handler::{BoxHandler, Handler, HandlerFuture, HandlerResult};
pub use reply::Reply;
pub use request::HttpRequest;

/// Status, size and error of a finished handler call, as outer middleware
/// observes it.
#[derive(Debug, Clone, Copy)]
pub struct Outcome<'a> {
    pub status: StatusCode,
    pub bytes_written: usize,
    pub error: Option<&'a (dyn std::error::Error + 'static)>,
}

impl<'a> Outcome<'a> {
    pub fn of(result: &'a HandlerResult) -> Self {
        match result {
            Ok(reply) => Outcome {
                status: reply.status(),
                bytes_written: reply.bytes_written(),
                error: reply
                    .failure()
                    .map(|err| err as &(dyn std::error::Error + 'static)),
            },
            Err(err) => Outcome {
                status: err.status(),
                bytes_written: 0,
                error: Some(err),
            },
        }
    }
}
