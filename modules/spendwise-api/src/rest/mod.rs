pub mod gemini;
pub mod records;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON body that falls back to `T::default()` when the body is absent, not
/// JSON, or the wrong shape. Handlers then report the missing field
/// themselves.
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Ok(LenientJson(T::default()));
        }
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(LenientJson(value)),
            Err(e) => {
                debug!(error = %e, "Unusable request body, treating as empty");
                Ok(LenientJson(T::default()))
            }
        }
    }
}
