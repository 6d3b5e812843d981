use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::domain::UserId;

use super::error::ApiError;

/// Header carrying the requesting user's id.
pub const SHARER_USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Requesting user, taken from the `X-Sharer-User-Id` header.
///
/// A missing or malformed header is rejected with 400.
#[derive(Debug, Clone, Copy)]
pub struct SharerUserId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .ok_or_else(|| ApiError::BadRequest(format!("{SHARER_USER_ID_HEADER} header is required")))?
            .to_str()
            .map_err(|_| ApiError::BadRequest(format!("{SHARER_USER_ID_HEADER} header is not valid text")))?;

        let id = Uuid::parse_str(raw.trim()).map_err(|_| {
            ApiError::BadRequest(format!("{SHARER_USER_ID_HEADER} header is not a valid id: {raw}"))
        })?;

        Ok(Self(UserId::from_uuid(id)))
    }
}
