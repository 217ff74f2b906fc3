//! HTTP handlers, one route table per feature area.

mod catalogue_handler;
mod customer_handler;
mod health_handler;

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use super::httpkit::{ApiError, Handler, HandlerResult, HttpRequest};

pub use catalogue_handler::CatalogueRoutes;
pub use customer_handler::{AddressRequest, CardRequest, CustomerRoutes, RegisterRequest};
pub use health_handler::HealthRoutes;

/// Bind an endpoint function to its shared collaborator.
fn endpoint<S, F, Fut>(collaborator: &Arc<S>, f: F) -> impl Handler
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<S>, HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    let collaborator = collaborator.clone();
    move |req: HttpRequest| f(collaborator.clone(), req)
}

/// The `id` path parameter. A missing or malformed id can match no record,
/// so it is reported with the endpoint's not-found message.
fn path_id(req: &HttpRequest, not_found: &str) -> Result<Uuid, ApiError> {
    req.param("id")
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| ApiError::not_found(not_found))
}
