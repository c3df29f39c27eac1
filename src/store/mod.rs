//! Content store seam.
//!
//! The durable source of truth for items and comments. Implementations own atomicity for view
//! counting and tag creation; callers never read-modify-write either.

mod memory;

pub use memory::MemoryContentStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Comment, ContentItem, PrincipalId};

/// Fields for a new item.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub author_id: PrincipalId,
    pub published: bool,
    pub tags: Vec<String>,
}

/// Partial item update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub published: Option<bool>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<String>>,
}

/// Fields for a new comment. `parent_id` names a top-level comment under the same item.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub item_id: i64,
    pub content: String,
    pub author_id: PrincipalId,
    pub parent_id: Option<i64>,
}

/// One slice of the published items, newest first, plus the overall published count.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSlice {
    pub items: Vec<ContentItem>,
    pub total: u64,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_item(&self, id: i64) -> Result<ContentItem>;

    /// Published items ordered by creation time descending, `page_size` per page.
    async fn list_published(&self, page_number: i64, page_size: i64) -> Result<ItemSlice>;

    /// Inserts an item. Tags are get-or-create by name, atomically.
    async fn create_item(&self, item: NewItem) -> Result<ContentItem>;

    async fn update_item(&self, id: i64, changes: ItemChanges) -> Result<ContentItem>;

    /// Deletes an item together with its comments.
    async fn delete_item(&self, id: i64) -> Result<()>;

    /// Adds one to the item's view count and returns the new count.
    async fn increment_views(&self, id: i64) -> Result<u64>;

    async fn get_comment(&self, id: i64) -> Result<Comment>;

    /// Every approved comment under an item, in no particular order.
    async fn list_approved_comments(&self, item_id: i64) -> Result<Vec<Comment>>;

    /// Inserts a comment; the parent item must exist.
    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn update_comment(&self, id: i64, content: String) -> Result<Comment>;

    async fn delete_comment(&self, id: i64) -> Result<()>;
}
