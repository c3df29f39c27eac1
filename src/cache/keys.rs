//! Cache key scheme.
//!
//! Every cacheable read maps to exactly one key string. Inputs are not validated: a page number
//! of zero or below still yields a key, it just never gets populated.

/// Key for a single item.
pub fn item_key(id: i64) -> String {
    format!("item:{id}")
}

/// Key for one page of the published item listing.
pub fn page_key(page_number: i64, page_size: i64) -> String {
    format!("items:page:{page_number}:size:{page_size}")
}

/// Key for the comment threads under an item.
pub fn comments_key(item_id: i64) -> String {
    format!("item:{item_id}:comments")
}
