//! Catalogue entities. The catalogue is read-only.

use serde::Serialize;
use uuid::Uuid;

use crate::config::QUERY_LIST_SEPARATOR;
use crate::types::PaginationParams;

/// Catalogue item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sock {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_urls: Vec<String>,
    pub price: f64,
    pub count: i32,
    /// Tag names, sorted.
    #[serde(rename = "tag")]
    pub tags: Vec<String>,
}

/// Sort key for catalogue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SockOrder {
    #[default]
    Id,
    Name,
    Price,
}

impl SockOrder {
    /// Case-insensitive; anything unknown sorts by id.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("name") => SockOrder::Name,
            Some("price") => SockOrder::Price,
            _ => SockOrder::Id,
        }
    }
}

/// Filter, order and page for a catalogue listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SockQuery {
    /// A sock matches when it carries any of these tags. Empty matches all.
    pub tags: Vec<String>,
    pub order: SockOrder,
    pub page: PaginationParams,
}

/// Split a `tags=a,b` query value, dropping empty segments.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|v| {
        v.split(QUERY_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
