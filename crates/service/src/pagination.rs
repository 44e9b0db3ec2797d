//! Pagination utilities for the signature listing
//!
//! Turns untrusted `offset`/`limit` query text into a `Pagination` and builds
//! the `self`/`prev`/`next` navigation links for a rendered page.

use configs::{CursorStep, PetitionConfig};
use serde::{Deserialize, Serialize};

/// Largest offset handed to the store (fits a signed 64-bit SQL integer).
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Query string as submitted. Values stay text so a malformed number never
/// rejects the request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// first row to return
    pub offset: u64,
    /// rows per page
    pub limit: u64,
}

impl Pagination {
    /// Coerce query text: missing, empty, negative or non-numeric values fall
    /// back to the defaults and `limit` is clamped to `1..=max_limit`.
    pub fn from_query(query: &PageQuery, cfg: &PetitionConfig) -> Self {
        let offset = parse_count(query.offset.as_deref()).unwrap_or(0).min(MAX_OFFSET);
        let limit = parse_count(query.limit.as_deref())
            .unwrap_or(cfg.default_limit)
            .clamp(1, cfg.max_limit.max(1));
        Self { offset, limit }
    }

    pub fn first(cfg: &PetitionConfig) -> Self {
        Self { offset: 0, limit: cfg.default_limit.max(1) }
    }
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim).filter(|s| !s.is_empty()).and_then(|s| s.parse::<u64>().ok())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn to(base_url: &str, offset: u64, limit: u64) -> Self {
        Self { href: format!("{base_url}/?offset={offset}&limit={limit}") }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

/// Navigation links for a page that returned `returned` of `total` rows.
pub fn build_links(base_url: &str, page: Pagination, returned: usize, total: u64, step: CursorStep) -> Links {
    let Pagination { offset, limit } = page;
    let returned = returned as u64;

    let (prev, next) = match step {
        CursorStep::Rows => (
            (offset > 0).then(|| offset.saturating_sub(limit)),
            (offset.saturating_add(returned) < total).then(|| offset.saturating_add(limit)),
        ),
        CursorStep::Legacy => (
            (offset > 0).then(|| offset - 1),
            (returned <= limit).then(|| offset.saturating_add(1)),
        ),
    };

    Links {
        self_link: Link::to(base_url, offset, limit),
        prev: prev.map(|o| Link::to(base_url, o, limit)),
        next: next.map(|o| Link::to(base_url, o, limit)),
    }
}
