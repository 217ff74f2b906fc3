//! Request view handed to handlers.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{Query, Request};
use axum::http::{request::Parts, HeaderMap, Method, Uri};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::ApiError;
use crate::config::MAX_BODY_BYTES;

/// Request head, path parameters and a not-yet-read body.
#[derive(Debug)]
pub struct HttpRequest {
    parts: Parts,
    params: HashMap<String, String>,
    body: Body,
}

impl HttpRequest {
    pub fn new(request: Request, params: HashMap<String, String>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            params,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Named path parameter, e.g. `id` for `/cards/{id}`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Decoded query string. A malformed query reads as empty.
    pub fn query(&self) -> HashMap<String, String> {
        Query::<HashMap<String, String>>::try_from_uri(&self.parts.uri)
            .map(|Query(values)| values)
            .unwrap_or_default()
    }

    /// HTTP Basic credentials, if present and well formed.
    pub fn basic_auth(&self) -> Option<(String, String)> {
        self.parts
            .headers
            .typed_get::<Authorization<Basic>>()
            .map(|Authorization(basic)| (basic.username().to_string(), basic.password().to_string()))
    }

    /// Read and decode a JSON body. Any read or decode failure is a 400.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T, ApiError> {
        let body = std::mem::take(&mut self.body);
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ApiError::bad_request("failed to read request body").with_cause(e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::bad_request("json unmarshal failed").with_cause(e))
    }

    /// [`json`](Self::json) followed by field validation.
    pub async fn json_validated<T: DeserializeOwned + Validate>(&mut self) -> Result<T, ApiError> {
        let value: T = self.json().await?;
        value
            .validate()
            .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))?;
        Ok(value)
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
