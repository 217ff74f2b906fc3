//! Catalogue service - read-only sock browsing.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Sock, SockQuery};
use crate::errors::{AppResult, OptionExt, ResultExt};
use crate::infra::UnitOfWork;

/// Catalogue service trait for dependency injection.
#[async_trait]
pub trait CatalogueService: Send + Sync {
    async fn list_socks(&self, query: SockQuery) -> AppResult<Vec<Sock>>;

    async fn count_socks(&self, tags: Vec<String>) -> AppResult<u64>;

    async fn get_sock(&self, id: Uuid) -> AppResult<Sock>;

    async fn tags(&self) -> AppResult<Vec<String>>;
}

/// Concrete implementation of CatalogueService using Unit of Work.
pub struct Catalogue<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalogue<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogueService for Catalogue<U> {
    async fn list_socks(&self, query: SockQuery) -> AppResult<Vec<Sock>> {
        self.uow
            .catalogue()
            .list(&query)
            .await
            .with_context(|| format!("list_socks(tags={:?}, order={:?})", query.tags, query.order))
    }

    async fn count_socks(&self, tags: Vec<String>) -> AppResult<u64> {
        self.uow
            .catalogue()
            .count(&tags)
            .await
            .with_context(|| format!("count_socks(tags={:?})", tags))
    }

    async fn get_sock(&self, id: Uuid) -> AppResult<Sock> {
        self.uow
            .catalogue()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
            .with_context(|| format!("get_sock(id={})", id))
    }

    async fn tags(&self) -> AppResult<Vec<String>> {
        self.uow.catalogue().tag_names().await.context("tags")
    }
}
