//! Content service.
//!
//! Read operations go through the cache-aside orchestrator. Write operations check ownership,
//! mutate the store, and only then invalidate a fixed set of keys per mutation:
//!
//! | Mutation | Keys invalidated |
//! |---|---|
//! | create item | first list page at the default page size |
//! | update item | `item:{id}`, first list page |
//! | delete item | `item:{id}`, first list page |
//! | create/update/delete comment | `item:{item_id}:comments` |
//!
//! Only the first list page is cleared on item writes. Later pages, and pages at other sizes,
//! stay stale until their TTL runs out.

mod views;

pub use views::ViewCounter;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::cache::{keys, CacheAside, CacheBackend, CacheStats};
use crate::error::{Result, ServiceError};
use crate::models::{
    Comment, CommentThread, ContentItem, CreateCommentRequest, CreateItemRequest, Page, PageQuery,
    UpdateCommentRequest, UpdateItemRequest,
};
use crate::store::{ContentStore, ItemChanges, NewComment, NewItem};

pub struct ContentService {
    store: Arc<dyn ContentStore>,
    cache: CacheAside,
    views: ViewCounter,
    default_page_size: i64,
}

impl ContentService {
    pub fn new(
        store: Arc<dyn ContentStore>,
        backend: Arc<dyn CacheBackend>,
        default_page_size: i64,
    ) -> Self {
        Self {
            views: ViewCounter::new(Arc::clone(&store)),
            cache: CacheAside::new(backend),
            store,
            default_page_size,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn first_page_key(&self) -> String {
        keys::page_key(1, self.default_page_size)
    }

    // == Reads ==

    /// Returns an item, recording a view whenever the read misses the cache.
    pub async fn get_item(&self, id: i64) -> Result<ContentItem> {
        let store = Arc::clone(&self.store);
        let views = self.views.clone();

        self.cache
            .read_through(&keys::item_key(id), move || async move {
                let mut item = store.get_item(id).await?;
                item.view_count = views.record_view(id).await?;
                Ok(item)
            })
            .await
    }

    pub async fn list_items(&self, query: PageQuery) -> Result<Page> {
        let (page, size) = query.resolve(self.default_page_size)?;
        let store = Arc::clone(&self.store);

        self.cache
            .read_through(&keys::page_key(page, size), move || async move {
                let slice = store.list_published(page, size).await?;
                Ok(Page::new(slice.items, slice.total, page, size))
            })
            .await
    }

    /// Approved top-level comments, newest first, each with its approved replies oldest first.
    pub async fn list_comments(&self, item_id: i64) -> Result<Vec<CommentThread>> {
        let store = Arc::clone(&self.store);

        self.cache
            .read_through(&keys::comments_key(item_id), move || async move {
                let comments = store.list_approved_comments(item_id).await?;
                Ok(build_threads(comments))
            })
            .await
    }

    // == Item writes ==

    pub async fn create_item(
        &self,
        principal: &str,
        req: CreateItemRequest,
    ) -> Result<ContentItem> {
        req.validate()?;
        let item = self
            .store
            .create_item(NewItem {
                title: req.title.unwrap_or_default(),
                body: req.body.unwrap_or_default(),
                summary: req.summary,
                cover: req.cover,
                author_id: principal.to_string(),
                published: req.published,
                tags: req.tags,
            })
            .await?;

        self.cache.invalidate(&[self.first_page_key()]).await;
        info!(item_id = item.id, author = %principal, "item created");
        Ok(item)
    }

    pub async fn update_item(
        &self,
        principal: &str,
        id: i64,
        req: UpdateItemRequest,
    ) -> Result<ContentItem> {
        req.validate()?;
        let existing = self.store.get_item(id).await?;
        ensure_owner(principal, &existing.author_id, || format!("item {id}"))?;

        let item = self
            .store
            .update_item(
                id,
                ItemChanges {
                    title: req.title,
                    body: req.body,
                    summary: req.summary,
                    cover: req.cover,
                    published: req.published,
                    tags: req.tags,
                },
            )
            .await?;

        self.cache
            .invalidate(&[keys::item_key(id), self.first_page_key()])
            .await;
        info!(item_id = id, "item updated");
        Ok(item)
    }

    pub async fn delete_item(&self, principal: &str, id: i64) -> Result<()> {
        let existing = self.store.get_item(id).await?;
        ensure_owner(principal, &existing.author_id, || format!("item {id}"))?;

        self.store.delete_item(id).await?;

        self.cache
            .invalidate(&[keys::item_key(id), self.first_page_key()])
            .await;
        info!(item_id = id, "item deleted");
        Ok(())
    }

    // == Comment writes ==

    pub async fn create_comment(
        &self,
        principal: &str,
        item_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment> {
        req.validate()?;
        let comment = self
            .store
            .create_comment(NewComment {
                item_id,
                content: req.content.unwrap_or_default(),
                author_id: principal.to_string(),
                parent_id: req.parent_id,
            })
            .await?;

        self.cache.invalidate(&[keys::comments_key(item_id)]).await;
        info!(comment_id = comment.id, item_id, "comment created");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        principal: &str,
        id: i64,
        req: UpdateCommentRequest,
    ) -> Result<Comment> {
        req.validate()?;
        let existing = self.store.get_comment(id).await?;
        ensure_owner(principal, &existing.author_id, || format!("comment {id}"))?;

        let comment = match req.content {
            Some(content) => self.store.update_comment(id, content).await?,
            None => existing,
        };

        self.cache
            .invalidate(&[keys::comments_key(comment.item_id)])
            .await;
        Ok(comment)
    }

    pub async fn delete_comment(&self, principal: &str, id: i64) -> Result<()> {
        let existing = self.store.get_comment(id).await?;
        ensure_owner(principal, &existing.author_id, || format!("comment {id}"))?;

        self.store.delete_comment(id).await?;

        self.cache
            .invalidate(&[keys::comments_key(existing.item_id)])
            .await;
        info!(comment_id = id, item_id = existing.item_id, "comment deleted");
        Ok(())
    }
}

fn ensure_owner(principal: &str, owner: &str, resource: impl FnOnce() -> String) -> Result<()> {
    if principal == owner {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "{} belongs to another principal",
            resource()
        )))
    }
}

/// Groups replies under their top-level parent. Replies whose parent is not listed are dropped.
fn build_threads(comments: Vec<Comment>) -> Vec<CommentThread> {
    let (mut top, replies): (Vec<Comment>, Vec<Comment>) =
        comments.into_iter().partition(|c| c.parent_id.is_none());
    top.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let mut by_parent: HashMap<i64, Vec<Comment>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.parent_id {
            by_parent.entry(parent_id).or_default().push(reply);
        }
    }

    top.into_iter()
        .map(|comment| {
            let mut replies = by_parent.remove(&comment.id).unwrap_or_default();
            replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            CommentThread { comment, replies }
        })
        .collect()
}
