//! Health service - liveness of the process and its database.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{HEALTH_SERVICE_APP, HEALTH_SERVICE_DB, HEALTH_STATUS_ERR, HEALTH_STATUS_OK};
use crate::errors::AppResult;
use crate::infra::Database;

/// Status of one named service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub service: String,
    pub status: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Health {
    pub fn new(service: &str, status: &str, details: Option<String>) -> Self {
        Self {
            service: service.to_string(),
            status: status.to_string(),
            time: Utc::now().to_rfc3339(),
            details,
        }
    }
}

/// Health check provider.
#[async_trait]
pub trait HealthChecker: Send + Sync {
    async fn check_health(&self) -> AppResult<Vec<Health>>;
}

/// Reports the application itself and a database round-trip.
pub struct HealthMonitor {
    database: Arc<Database>,
}

impl HealthMonitor {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl HealthChecker for HealthMonitor {
    async fn check_health(&self) -> AppResult<Vec<Health>> {
        let app = Health::new(HEALTH_SERVICE_APP, HEALTH_STATUS_OK, None);

        let db = match self.database.ping().await {
            Ok(()) => Health::new(HEALTH_SERVICE_DB, HEALTH_STATUS_OK, None),
            Err(e) => {
                tracing::warn!(error = %e, "database health check failed");
                Health::new(HEALTH_SERVICE_DB, HEALTH_STATUS_ERR, Some(e.to_string()))
            }
        };

        Ok(vec![app, db])
    }
}
