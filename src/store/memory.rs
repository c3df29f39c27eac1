//! In-process `ContentStore`.
//!
//! All tables sit behind one lock, so every trait method is a single atomic step: view
//! increments cannot lose updates and concurrent writers share one tag row per name.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Result, ServiceError};
use crate::models::{Comment, ContentItem};
use crate::store::{ContentStore, ItemChanges, ItemSlice, NewComment, NewItem};

#[derive(Debug, Default)]
struct Tables {
    last_item_id: i64,
    last_comment_id: i64,
    last_tag_id: i64,
    items: BTreeMap<i64, ContentItem>,
    comments: BTreeMap<i64, Comment>,
    /// Unique tag name to tag id
    tags: HashMap<String, i64>,
}

impl Tables {
    /// Ensures each name has a tag row and returns the names deduplicated, first occurrence kept.
    fn upsert_tags(&mut self, names: Vec<String>) -> Vec<String> {
        let mut unique = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim().to_string();
            if unique.contains(&name) {
                continue;
            }
            if !self.tags.contains_key(&name) {
                self.last_tag_id += 1;
                self.tags.insert(name.clone(), self.last_tag_id);
            }
            unique.push(name);
        }
        unique
    }

    fn item_mut(&mut self, id: i64) -> Result<&mut ContentItem> {
        self.items
            .get_mut(&id)
            .ok_or_else(|| ServiceError::item_not_found(id))
    }
}

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    tables: RwLock<Tables>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tag names ever created.
    pub async fn tag_count(&self) -> usize {
        self.tables.read().await.tags.len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_item(&self, id: i64) -> Result<ContentItem> {
        self.tables
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::item_not_found(id))
    }

    async fn list_published(&self, page_number: i64, page_size: i64) -> Result<ItemSlice> {
        let tables = self.tables.read().await;
        let mut published: Vec<&ContentItem> =
            tables.items.values().filter(|item| item.published).collect();
        published.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = published.len() as u64;
        let items = if page_number < 1 || page_size < 1 {
            Vec::new()
        } else {
            let offset = (page_number - 1).saturating_mul(page_size);
            published
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(page_size as usize)
                .cloned()
                .collect()
        };
        Ok(ItemSlice { items, total })
    }

    async fn create_item(&self, item: NewItem) -> Result<ContentItem> {
        let mut tables = self.tables.write().await;
        let tags = tables.upsert_tags(item.tags);
        tables.last_item_id += 1;

        let now = Utc::now();
        let created = ContentItem {
            id: tables.last_item_id,
            title: item.title,
            body: item.body,
            summary: item.summary,
            cover: item.cover,
            author_id: item.author_id,
            published: item.published,
            view_count: 0,
            created_at: now,
            updated_at: now,
            tags,
        };
        tables.items.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_item(&self, id: i64, changes: ItemChanges) -> Result<ContentItem> {
        let mut tables = self.tables.write().await;
        tables.item_mut(id)?;
        let tags = changes.tags.map(|names| tables.upsert_tags(names));

        let item = tables.item_mut(id)?;
        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(body) = changes.body {
            item.body = body;
        }
        if let Some(summary) = changes.summary {
            item.summary = Some(summary);
        }
        if let Some(cover) = changes.cover {
            item.cover = Some(cover);
        }
        if let Some(published) = changes.published {
            item.published = published;
        }
        if let Some(tags) = tags {
            item.tags = tags;
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.items.remove(&id).is_none() {
            return Err(ServiceError::item_not_found(id));
        }
        tables.comments.retain(|_, comment| comment.item_id != id);
        Ok(())
    }

    async fn increment_views(&self, id: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let item = tables.item_mut(id)?;
        item.view_count += 1;
        Ok(item.view_count)
    }

    async fn get_comment(&self, id: i64) -> Result<Comment> {
        self.tables
            .read()
            .await
            .comments
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::comment_not_found(id))
    }

    async fn list_approved_comments(&self, item_id: i64) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.item_id == item_id && c.approved)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.items.contains_key(&comment.item_id) {
            return Err(ServiceError::item_not_found(comment.item_id));
        }

        if let Some(parent_id) = comment.parent_id {
            match tables.comments.get(&parent_id) {
                Some(parent)
                    if parent.item_id == comment.item_id && parent.parent_id.is_none() => {}
                Some(_) => {
                    return Err(ServiceError::Validation(format!(
                        "comment {parent_id} cannot take replies under item {}",
                        comment.item_id
                    )))
                }
                None => {
                    return Err(ServiceError::Validation(format!(
                        "parent comment {parent_id} does not exist"
                    )))
                }
            }
        }

        tables.last_comment_id += 1;
        let created = Comment {
            id: tables.last_comment_id,
            content: comment.content,
            author_id: comment.author_id,
            item_id: comment.item_id,
            parent_id: comment.parent_id,
            approved: true,
            created_at: Utc::now(),
        };
        tables.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_comment(&self, id: i64, content: String) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .get_mut(&id)
            .ok_or_else(|| ServiceError::comment_not_found(id))?;
        comment.content = content;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(ServiceError::comment_not_found(id));
        }
        // replies go with their parent
        tables.comments.retain(|_, c| c.parent_id != Some(id));
        Ok(())
    }
}
