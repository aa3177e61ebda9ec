use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// `Json<T>` whose rejection renders as `{"error": "INVALID_JSON"}` instead of
/// axum's plain-text body.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::BadRequest("INVALID_JSON"))
            }
        }
    }
}

/// `Query<T>` with the same error body shape: `{"error": "INVALID_QUERY"}`.
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected query string: {}", rejection.body_text());
                Err(ApiError::BadRequest("INVALID_QUERY"))
            }
        }
    }
}
