//! Health endpoint.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use super::endpoint;
use crate::api::httpkit::{HandlerResult, HttpRequest, Reply};
use crate::api::router::{Route, Routes};
use crate::services::HealthChecker;

pub struct HealthRoutes {
    checker: Arc<dyn HealthChecker>,
}

impl HealthRoutes {
    pub fn new(checker: Arc<dyn HealthChecker>) -> Self {
        Self { checker }
    }
}

impl Routes for HealthRoutes {
    fn routes(&self) -> Vec<Route> {
        vec![Route::get("/health", endpoint(&self.checker, health))]
    }
}

/// A degraded dependency is reported in the body; only a failing checker is
/// an error.
async fn health(checker: Arc<dyn HealthChecker>, _req: HttpRequest) -> HandlerResult {
    let healths = checker.check_health().await?;
    Reply::json(StatusCode::OK, &json!({ "healths": healths }))
}
