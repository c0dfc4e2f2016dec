//! Caller identity extraction.
//!
//! Identity is asserted, not authenticated: the engine trusts whatever user
//! id the transport hands it, and this gateway reads that id from the
//! `x-user-id` header. Anything missing or unparseable is a 401 before the
//! handler runs.

use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared_types::UserId;

/// Header carrying the caller's id on every `/api` route.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The calling user, as claimed by the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.parse::<UserId>().ok())
            .ok_or_else(ApiError::unauthorized)?;
        Ok(CallerId(user))
    }
}
