//! Entity, request and response models for the content API
//!
//! Entities double as the cache wire format: what the API returns is what gets cached.

pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Comment, CommentThread, ContentItem, Page, PrincipalId};
pub use requests::{
    CreateCommentRequest, CreateItemRequest, PageQuery, UpdateCommentRequest, UpdateItemRequest,
};
pub use responses::{HealthResponse, StatsResponse};
