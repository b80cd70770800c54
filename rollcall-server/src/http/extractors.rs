//! Custom Axum extractors

use axum::extract::{FromRequest, Request};
use axum::Json;

use super::error::ApiError;
use crate::models::{PersonFields, PersonPayload};

/// Extract a JSON person body and validate it.
///
/// Malformed JSON, a missing `Content-Type: application/json`, missing fields
/// and failed validation all reject with `ApiError::InvalidPayload`.
pub struct ValidPerson(pub PersonFields);

impl<S> FromRequest<S> for ValidPerson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<PersonPayload>::from_request(req, state).await?;
        Ok(Self(payload.validate()?))
    }
}
