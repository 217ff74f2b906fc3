//! Hypermedia links embedded in customer, address and card responses.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Href {
    pub href: String,
}

/// Relation name to target, rendered as `{"rel": {"href": "..."}}`.
pub type Links = BTreeMap<&'static str, Href>;

/// Host (and optional port) absolute link URLs are built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDomain(String);

impl LinkDomain {
    pub fn new(domain: impl Into<String>) -> Self {
        Self(domain.into())
    }

    fn url(&self, path: &str) -> Href {
        Href {
            href: format!("http://{}{}", self.0, path),
        }
    }

    pub fn customer(&self, id: Uuid) -> Links {
        let base = format!("/customers/{}", id);
        Links::from([
            ("self", self.url(&base)),
            ("customer", self.url(&base)),
            ("addresses", self.url(&format!("{}/addresses", base))),
            ("cards", self.url(&format!("{}/cards", base))),
        ])
    }

    pub fn address(&self, id: Uuid) -> Links {
        let path = format!("/addresses/{}", id);
        Links::from([("self", self.url(&path)), ("address", self.url(&path))])
    }

    pub fn card(&self, id: Uuid) -> Links {
        let path = format!("/cards/{}", id);
        Links::from([("self", self.url(&path)), ("card", self.url(&path))])
    }
}
