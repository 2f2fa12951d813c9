//! Extractors whose rejections use the uniform error body instead of axum's plain text.

use async_trait::async_trait;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Json, Query, RawPathParams, Request,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Integer id captured from the route path, e.g. `/departments/:department_id`
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal_server_error(e.body_text()))?;

        let (key, value) = params
            .iter()
            .next()
            .ok_or_else(|| ApiError::internal_server_error("Route has no path parameter"))?;

        value.parse::<i32>().map(PathId).map_err(|_| {
            ApiError::bad_request(
                "INVALID_PATH_PARAMETER",
                format!("{} must be an integer, got {:?}", key, value),
                Some(key),
            )
        })
    }
}

/// `Query<T>` with rejections mapped to [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `Json<T>` with rejections mapped to [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        ApiError::bad_request("INVALID_QUERY_PARAMETER", rejection.body_text(), None)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request("INVALID_JSON_BODY", rejection.body_text(), None)
    }
}
