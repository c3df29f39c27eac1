//! Principal extraction.
//!
//! Writes are attributed to the principal named in the `X-Principal-Id` header. Reads never
//! look at it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ServiceError;
use crate::models::PrincipalId;

pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// The authenticated caller of a write.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal(pub PrincipalId);

impl Principal {
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .ok_or_else(|| ServiceError::Unauthorized("missing principal header".to_string()))?;

        let id = value
            .to_str()
            .map_err(|_| ServiceError::Unauthorized("principal header is not text".to_string()))?
            .trim();

        if id.is_empty() {
            return Err(ServiceError::Unauthorized(
                "principal header is empty".to_string(),
            ));
        }

        Ok(Principal(id.to_string()))
    }
}
