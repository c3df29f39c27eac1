//! Content Cache - cache-aside service for articles and threaded comments
//!
//! Reads are served through a TTL cache in front of the content store; writes go to the store
//! and then invalidate a fixed set of cache keys.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use service::ContentService;
pub use tasks::spawn_cleanup_task;
