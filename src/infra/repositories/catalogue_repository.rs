//! Catalogue repository (read-only).
//!
//! Tags are loaded from the join table and grouped in memory; image URLs are
//! stored as a JSON array. Neither round-trips through a comma-joined string.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::entities::{
    sock::{self, Entity as SockEntity},
    sock_tag::{self, Entity as SockTagEntity},
    tag::{self, Entity as TagEntity},
};
use crate::domain::{Sock, SockOrder, SockQuery};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalogue repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// One page of socks matching the query
    async fn list(&self, query: &SockQuery) -> AppResult<Vec<Sock>>;

    /// Number of distinct socks carrying any of `tags` (all socks when empty)
    async fn count(&self, tags: &[String]) -> AppResult<u64>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Sock>>;

    /// All tag names
    async fn tag_names(&self) -> AppResult<Vec<String>>;
}

/// Concrete implementation of CatalogueRepository
pub struct CatalogueStore {
    db: DatabaseConnection,
}

impl CatalogueStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// IDs of socks carrying any of the named tags.
    async fn tagged_sock_ids(&self, tags: &[String]) -> AppResult<BTreeSet<Uuid>> {
        let tag_ids: Vec<i32> = TagEntity::find()
            .filter(tag::Column::Name.is_in(tags.iter().cloned()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        if tag_ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let rows = SockTagEntity::find()
            .filter(sock_tag::Column::TagId.is_in(tag_ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| r.sock_id).collect())
    }

    /// Sorted tag names for each sock.
    async fn tags_by_sock(&self, sock_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<String>>> {
        if sock_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = SockTagEntity::find()
            .filter(sock_tag::Column::SockId.is_in(sock_ids.iter().copied()))
            .all(&self.db)
            .await?;
        let tag_ids: BTreeSet<i32> = links.iter().map(|l| l.tag_id).collect();
        if tag_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let names: HashMap<i32, String> = TagEntity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
        for link in links {
            if let Some(name) = names.get(&link.tag_id) {
                grouped.entry(link.sock_id).or_default().push(name.clone());
            }
        }
        for tags in grouped.values_mut() {
            tags.sort();
            tags.dedup();
        }
        Ok(grouped)
    }

    async fn assemble(&self, models: Vec<sock::Model>) -> AppResult<Vec<Sock>> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut tags = self.tags_by_sock(&ids).await?;

        models
            .into_iter()
            .map(|model| {
                let sock_tags = tags.remove(&model.id).unwrap_or_default();
                to_sock(model, sock_tags)
            })
            .collect()
    }
}

#[async_trait]
impl CatalogueRepository for CatalogueStore {
    async fn list(&self, query: &SockQuery) -> AppResult<Vec<Sock>> {
        let mut select = SockEntity::find();

        if !query.tags.is_empty() {
            let ids = self.tagged_sock_ids(&query.tags).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(sock::Column::Id.is_in(ids));
        }

        select = match query.order {
            SockOrder::Id => select.order_by_asc(sock::Column::Id),
            SockOrder::Name => select
                .order_by_asc(sock::Column::Name)
                .order_by_asc(sock::Column::Id),
            SockOrder::Price => select
                .order_by_asc(sock::Column::Price)
                .order_by_asc(sock::Column::Id),
        };

        let models = select
            .offset(query.page.offset())
            .limit(query.page.limit())
            .all(&self.db)
            .await?;

        self.assemble(models).await
    }

    async fn count(&self, tags: &[String]) -> AppResult<u64> {
        if tags.is_empty() {
            return Ok(SockEntity::find().count(&self.db).await?);
        }
        Ok(self.tagged_sock_ids(tags).await?.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Sock>> {
        let Some(model) = SockEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut socks = self.assemble(vec![model]).await?;
        Ok(socks.pop())
    }

    async fn tag_names(&self) -> AppResult<Vec<String>> {
        let tags = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}

fn to_sock(model: sock::Model, tags: Vec<String>) -> AppResult<Sock> {
    let image_urls: Vec<String> = serde_json::from_str(&model.image_urls).map_err(|e| {
        AppError::internal(format!("sock {} has malformed image urls: {}", model.id, e))
    })?;

    Ok(Sock {
        id: model.id,
        name: model.name,
        description: model.description,
        image_urls,
        price: model.price,
        count: model.count,
        tags,
    })
}
