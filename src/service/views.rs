//! View counting.
//!
//! Views are recorded only when an item read misses the cache, so a warm entry absorbs every
//! read until it expires or is invalidated. Counts therefore sample real traffic rather than
//! tally it.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::store::ContentStore;

#[derive(Clone)]
pub struct ViewCounter {
    store: Arc<dyn ContentStore>,
}

impl ViewCounter {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Adds exactly one view at the store and returns the post-increment count.
    pub async fn record_view(&self, item_id: i64) -> Result<u64> {
        let views = self.store.increment_views(item_id).await?;
        debug!(item_id, views, "view recorded");
        Ok(views)
    }
}
