//! Request DTOs for the content API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::config::MAX_PAGE_SIZE;
use crate::error::{Result, ServiceError};

/// Request body for `POST /items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateItemRequest {
    /// Checks the required fields are present and non-empty.
    pub fn validate(&self) -> Result<()> {
        require("title", self.title.as_deref())?;
        require("body", self.body.as_deref())?;
        validate_tags(&self.tags)
    }
}

/// Request body for `PUT /items/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl UpdateItemRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require("title", Some(title))?;
        }
        if let Some(body) = &self.body {
            require("body", Some(body))?;
        }
        match &self.tags {
            Some(tags) => validate_tags(tags),
            None => Ok(()),
        }
    }
}

/// Request body for `POST /items/:id/comments`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<()> {
        require("content", self.content.as_deref())
    }
}

/// Request body for `PUT /comments/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(content) = &self.content {
            require("content", Some(content))?;
        }
        Ok(())
    }
}

/// Query string for `GET /items`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Resolves the page number and size, filling defaults and rejecting out-of-range values.
    pub fn resolve(&self, default_page_size: i64) -> Result<(i64, i64)> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(default_page_size);

        if page < 1 {
            return Err(ServiceError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&per_page) {
            return Err(ServiceError::Validation(format!(
                "per_page must be between 1 and {MAX_PAGE_SIZE}, got {per_page}"
            )));
        }
        Ok((page, per_page))
    }
}

fn require(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ServiceError::Validation(format!("`{field}` is required"))),
    }
}

fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ServiceError::Validation("tag names cannot be empty".into()));
    }
    Ok(())
}
