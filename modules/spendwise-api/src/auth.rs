use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use spendwise_common::UserId;

use crate::error::ApiError;
use crate::jwt::bearer_token;
use crate::AppState;

/// Authenticated caller. Extract this in handlers that require auth.
/// A missing, malformed or expired bearer token is a 401.
pub struct AuthUser {
    pub id: UserId,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthorized)?;

        let claims = state.jwt.verify_token(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ApiError::Unauthorized
        })?;

        let id = claims.user_id().ok_or(ApiError::Unauthorized)?;
        Ok(AuthUser { id: id.to_string() })
    }
}
