use crate::errors::ApiError;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

/// `axum::extract::Json` with an [`ApiError`] rejection, so malformed bodies answer with JSON.
#[derive(FromRequest)]
#[from_request(via(axum::extract::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        let Self(value) = self;
        axum::Json(value).into_response()
    }
}

/// [`Json`] followed by `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = ApiError>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `axum::extract::Path` with an [`ApiError`] rejection.
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        use axum::extract::path::ErrorKind::*;
        use ApiError::PathError;

        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(PathRejection::FailedToDeserializePathParams(inner)) => {
                let kind = inner.into_kind();
                Err(match &kind {
                    // nested maps and the like are a programming error, not a bad request
                    UnsupportedType { .. } => PathError(500, kind.to_string()),
                    Message(msg) => PathError(400, msg.to_string()),
                    _ => PathError(400, kind.to_string()),
                })
            }
            Err(PathRejection::MissingPathParams(error)) => Err(PathError(500, error.to_string())),
            Err(rejection) => Err(PathError(500, format!("Unhandled path rejection: {rejection}"))),
        }
    }
}
