//! Entity shapes shared by the API and the cache
//!
//! The cache stores exactly these payloads, serialized as JSON text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque principal identifier issued by the external authenticator.
pub type PrincipalId = String;

/// An article owned by a single principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub author_id: PrincipalId,
    pub published: bool,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tag names, unique per item, in insertion order
    pub tags: Vec<String>,
}

/// A comment under an item, optionally replying to a top-level comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_id: PrincipalId,
    pub item_id: i64,
    pub parent_id: Option<i64>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// A top-level comment with its replies, as served by the comments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// One page of published items, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<ContentItem>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: i64,
}

impl Page {
    /// Assembles a page, deriving the page count from `total` and `page_size`.
    pub fn new(items: Vec<ContentItem>, total: u64, page_number: i64, page_size: i64) -> Self {
        let size = page_size.max(1) as u64;
        Self {
            items,
            total,
            total_pages: total.div_ceil(size),
            current_page: page_number,
        }
    }
}
