//! Successful (or already-translated) handler output.

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;

use super::error::{ApiError, HandlerError};
use super::handler::HandlerResult;
use crate::config::{GENERIC_ERROR_MESSAGE, JSON_CONTENT_TYPE};

const FALLBACK_ERROR_BODY: &[u8] = br#"{"code":500,"message":"something went wrong"}"#;

/// A fully encoded response.
///
/// Bodies are encoded before the reply exists, so an encoding failure can
/// still be reported as an error and no partial body is ever sent.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    failure: Option<Arc<ApiError>>,
}

impl Reply {
    /// JSON body with the given status.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> HandlerResult {
        let body = serde_json::to_vec(value).map_err(HandlerError::unclassified)?;
        Ok(Self::json_bytes(status, Bytes::from(body)))
    }

    fn json_bytes(status: StatusCode, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        Self {
            status,
            headers,
            body,
            failure: None,
        }
    }

    /// Render a structured error as `{"code", "message"}`. The error is kept
    /// on the reply so outer middleware can log its cause.
    pub fn from_error(err: ApiError) -> Self {
        let body = serde_json::to_vec(&err.body())
            .map(Bytes::from)
            .unwrap_or_else(|_| Bytes::from_static(FALLBACK_ERROR_BODY));

        let mut reply = Self::json_bytes(err.code(), body);
        reply.failure = Some(Arc::new(err));
        reply
    }

    /// Unclassified errors become a 500 with a generic message.
    pub fn from_handler_error(err: HandlerError) -> Self {
        match err {
            HandlerError::Api(err) => Self::from_error(err),
            HandlerError::Unclassified(cause) => {
                Self::from_error(ApiError::internal(GENERIC_ERROR_MESSAGE).with_cause(cause))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn bytes_written(&self) -> usize {
        self.body.len()
    }

    /// The error this reply was rendered from, if any.
    pub fn failure(&self) -> Option<&ApiError> {
        self.failure.as_deref()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}
