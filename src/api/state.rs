//! Application state - Dependency injection container.
//!
//! Holds the services the route tables are built from, plus the optional
//! metrics handle and image directory.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::domain::LinkDomain;
use crate::infra::Database;
use crate::services::{
    CatalogueService, CustomerService, HealthChecker, ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<dyn CatalogueService>,
    pub customers: Arc<dyn CustomerService>,
    pub health: Arc<dyn HealthChecker>,
    /// Domain used in `_links` URLs
    pub links: LinkDomain,
    /// Present when a Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Directory served under the catalogue image prefix
    pub image_path: Option<PathBuf>,
}

impl AppState {
    /// Wire every service over the database.
    pub fn from_config(
        database: Arc<Database>,
        config: &Config,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let container = Services::from_database(database);

        Self {
            catalogue: container.catalogue(),
            customers: container.customers(),
            health: container.health(),
            links: LinkDomain::new(config.link_domain.clone()),
            metrics,
            image_path: Some(config.image_path.clone()),
        }
    }

    /// Create state with manually injected services, without metrics or
    /// static images.
    pub fn new(
        catalogue: Arc<dyn CatalogueService>,
        customers: Arc<dyn CustomerService>,
        health: Arc<dyn HealthChecker>,
        links: LinkDomain,
    ) -> Self {
        Self {
            catalogue,
            customers,
            health,
            links,
            metrics: None,
            image_path: None,
        }
    }
}
