//! Structured handler failures.

use std::error::Error as StdError;
use std::fmt;

use axum::http::StatusCode;
use serde::Serialize;

use crate::errors::AppError;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A failure with the status and message the client will see.
///
/// The cause is kept for server-side logs and never serialized.
#[derive(Debug)]
pub struct ApiError {
    code: StatusCode,
    message: String,
    cause: Option<BoxError>,
}

/// Wire form of [`ApiError`].
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: u16,
    pub message: &'a str,
}

impl ApiError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            code: self.code.as_u16(),
            message: &self.message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.code.as_u16(), self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// What a handler returns instead of writing an error body itself.
#[derive(Debug)]
pub enum HandlerError {
    /// Already classified: status and message are final.
    Api(ApiError),
    /// Anything else. Rendered as a 500 with a generic message.
    Unclassified(BoxError),
}

impl HandlerError {
    pub fn unclassified(err: impl Into<BoxError>) -> Self {
        HandlerError::Unclassified(err.into())
    }

    /// Status the client will eventually receive.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Api(err) => err.code(),
            HandlerError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Api(err) => fmt::Display::fmt(err, f),
            HandlerError::Unclassified(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl StdError for HandlerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            HandlerError::Api(err) => err.source(),
            HandlerError::Unclassified(err) => err.source(),
        }
    }
}

impl From<ApiError> for HandlerError {
    fn from(err: ApiError) -> Self {
        HandlerError::Api(err)
    }
}

impl From<AppError> for HandlerError {
    fn from(err: AppError) -> Self {
        HandlerError::Unclassified(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_cause() {
        let err = ApiError::not_found("card not found").with_cause(AppError::NotFound);
        assert_eq!(err.to_string(), "Error 404: card not found: not found");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_body_omits_cause() {
        let err = ApiError::conflict("card already registered")
            .with_cause(AppError::internal("unique index card.long_num"));
        let json = serde_json::to_value(err.body()).unwrap();

        assert_eq!(json, serde_json::json!({"code": 409, "message": "card already registered"}));
    }

    #[test]
    fn test_app_error_is_unclassified() {
        let err = HandlerError::from(AppError::NotFound);
        assert!(matches!(err, HandlerError::Unclassified(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
