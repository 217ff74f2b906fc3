//! Application route configuration.

use axum::routing::get;
use axum::Router;

use super::handlers::{CatalogueRoutes, CustomerRoutes, HealthRoutes};
use super::middleware::default_chain;
use super::router::{compose, Mux, RouteError};
use super::AppState;
use crate::config::{IMAGE_ROUTE_PREFIX, METRICS_ROUTE};

/// Create the application router with all routes configured.
///
/// Fails only when two route tables claim the same method and pattern.
pub fn create_router(state: AppState) -> Result<Router, RouteError> {
    let catalogue = CatalogueRoutes::new(state.catalogue.clone());
    let customers = CustomerRoutes::new(state.customers.clone(), state.links.clone());
    let health = HealthRoutes::new(state.health.clone());

    let mut mux = Mux::new();
    mux.install(compose(&[&catalogue, &customers, &health]), &default_chain())?;

    // Outside the chain: static images and the metrics exposition
    if let Some(dir) = &state.image_path {
        mux.mount_static(IMAGE_ROUTE_PREFIX, dir);
    }
    if let Some(handle) = state.metrics {
        mux.raw_route(METRICS_ROUTE, get(move || async move { handle.render() }));
    }

    Ok(mux.into_router())
}
