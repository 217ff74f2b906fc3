//! Catalogue endpoints (read-only).

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use super::{endpoint, path_id};
use crate::api::httpkit::{ApiError, HandlerResult, HttpRequest, Reply};
use crate::api::router::{Route, Routes};
use crate::domain::catalogue::parse_tags;
use crate::domain::{SockOrder, SockQuery};
use crate::services::CatalogueService;
use crate::types::PaginationParams;

const SOCK_NOT_FOUND: &str = "failed to get sock";

pub struct CatalogueRoutes {
    service: Arc<dyn CatalogueService>,
}

impl CatalogueRoutes {
    pub fn new(service: Arc<dyn CatalogueService>) -> Self {
        Self { service }
    }
}

impl Routes for CatalogueRoutes {
    fn routes(&self) -> Vec<Route> {
        vec![
            Route::get("/catalogue", endpoint(&self.service, list_socks)),
            Route::get("/catalogue/size", endpoint(&self.service, count_socks)),
            Route::get("/catalogue/{id}", endpoint(&self.service, get_sock)),
            Route::get("/tags", endpoint(&self.service, list_tags)),
        ]
    }
}

async fn list_socks(service: Arc<dyn CatalogueService>, req: HttpRequest) -> HandlerResult {
    let query = req.query();
    let get = |key: &str| query.get(key).map(String::as_str);

    let sock_query = SockQuery {
        tags: parse_tags(get("tags")),
        order: SockOrder::parse(get("order").or_else(|| get("sort"))),
        page: PaginationParams::from_query(get("page"), get("size")),
    };

    let socks = service.list_socks(sock_query).await?;
    Reply::json(StatusCode::OK, &json!({ "sock": socks }))
}

async fn count_socks(service: Arc<dyn CatalogueService>, req: HttpRequest) -> HandlerResult {
    let query = req.query();
    let tags = parse_tags(query.get("tags").map(String::as_str));

    let size = service.count_socks(tags).await?;
    Reply::json(StatusCode::OK, &json!({ "size": size }))
}

async fn get_sock(service: Arc<dyn CatalogueService>, req: HttpRequest) -> HandlerResult {
    let id = path_id(&req, SOCK_NOT_FOUND)?;

    match service.get_sock(id).await {
        Ok(sock) => Reply::json(StatusCode::OK, &sock),
        Err(err) if err.is_not_found() => Err(ApiError::not_found(SOCK_NOT_FOUND)
            .with_cause(err)
            .into()),
        Err(err) => Err(err.into()),
    }
}

async fn list_tags(service: Arc<dyn CatalogueService>, _req: HttpRequest) -> HandlerResult {
    let tags = service.tags().await?;
    Reply::json(StatusCode::OK, &json!({ "tags": tags }))
}
