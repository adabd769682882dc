//! Request extractors whose rejections use the API error envelope.
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies;
//! these wrappers map every failure into an [`AppError`].

use std::convert::Infallible;

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

async fn parse_json<S, T>(req: Request, state: &S) -> AppResult<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    Json::<T>::from_request(req, state)
        .await
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// JSON body that has passed its `#[validate]` rules.
///
/// Malformed JSON becomes a 400 `BAD_REQUEST`; rule failures become a 400
/// `VALIDATION_ERROR` listing every offending field.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value: T = parse_json(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// JSON body whose parse and validation errors are held until the handler
/// calls [`JsonBody::validated`].
///
/// Used where the permission check depends on handler state, so a caller
/// without access sees 401/403 regardless of what they sent.
#[derive(Debug)]
pub struct JsonBody<T>(AppResult<T>);

impl<T: Validate> JsonBody<T> {
    pub fn validated(self) -> AppResult<T> {
        let value = self.0?;
        value.validate()?;
        Ok(value)
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(JsonBody(parse_json(req, state).await))
    }
}

/// Path parameters. A segment that does not parse (`/titles/abc`) is a 404,
/// the same as a route that does not exist.
#[derive(Debug, Clone)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(PathRejection::FailedToDeserializePathParams(err)) => {
                Err(AppError::NotFound(err.body_text()))
            }
            Err(rejection) => Err(AppError::InternalError(rejection.body_text())),
        }
    }
}

/// Query string parameters; a malformed value is a 400 `BAD_REQUEST`.
#[derive(Debug, Clone)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| Query(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
