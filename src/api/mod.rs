//! API Module
//!
//! HTTP handlers and routing for the content service.
//!
//! # Endpoints
//! - `GET /items` - One page of published items (`?page=&per_page=`)
//! - `POST /items` - Create an item
//! - `GET /items/:id` - Fetch an item
//! - `PUT /items/:id` - Partially update an item
//! - `DELETE /items/:id` - Delete an item and its comments
//! - `GET /items/:id/comments` - Threaded approved comments
//! - `POST /items/:id/comments` - Comment on an item or reply to a comment
//! - `PUT /comments/:id` - Edit a comment
//! - `DELETE /comments/:id` - Delete a comment and its replies
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint
//!
//! Writes require the `X-Principal-Id` header.

pub mod extract;
pub mod handlers;
pub mod principal;
pub mod routes;

pub use extract::{JsonBody, QueryParams};
pub use handlers::*;
pub use principal::{Principal, PRINCIPAL_HEADER};
pub use routes::create_router;
