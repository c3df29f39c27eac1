//! API Handlers
//!
//! Thin HTTP adapters over `ContentService`. Reads are anonymous; writes take a `Principal`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::extract::{JsonBody, QueryParams};
use super::principal::Principal;
use crate::cache::CacheBackend;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    Comment, CommentThread, ContentItem, CreateCommentRequest, CreateItemRequest, HealthResponse,
    Page, PageQuery, StatsResponse, UpdateCommentRequest, UpdateItemRequest,
};
use crate::service::ContentService;
use crate::store::{ContentStore, MemoryContentStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContentService>,
}

impl AppState {
    pub fn new(service: ContentService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wires an in-memory content store to the given cache backend.
    pub fn from_config(config: &Config, backend: Arc<dyn CacheBackend>) -> Self {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        Self::new(ContentService::new(
            store,
            backend,
            config.default_page_size,
        ))
    }
}

// == Items ==

/// Handler for GET /items
pub async fn list_items_handler(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<Json<Page>> {
    Ok(Json(state.service.list_items(query).await?))
}

/// Handler for GET /items/:id
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContentItem>> {
    Ok(Json(state.service.get_item(id).await?))
}

/// Handler for POST /items
pub async fn create_item_handler(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(req): JsonBody<CreateItemRequest>,
) -> Result<(StatusCode, Json<ContentItem>)> {
    let item = state.service.create_item(principal.id(), req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PUT /items/:id
pub async fn update_item_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<UpdateItemRequest>,
) -> Result<Json<ContentItem>> {
    Ok(Json(
        state.service.update_item(principal.id(), id, req).await?,
    ))
}

/// Handler for DELETE /items/:id
pub async fn delete_item_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service.delete_item(principal.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// == Comments ==

/// Handler for GET /items/:id/comments
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<Vec<CommentThread>>> {
    Ok(Json(state.service.list_comments(item_id).await?))
}

/// Handler for POST /items/:id/comments
pub async fn create_comment_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(item_id): Path<i64>,
    JsonBody(req): JsonBody<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = state
        .service
        .create_comment(principal.id(), item_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Handler for PUT /comments/:id
pub async fn update_comment_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    Ok(Json(
        state.service.update_comment(principal.id(), id, req).await?,
    ))
}

/// Handler for DELETE /comments/:id
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service.delete_comment(principal.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// == Service ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.service.cache_stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
