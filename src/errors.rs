use crate::service::upload_service::UploadError;
use crate::util::extractor::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::error::ErrorKind;
use std::error::Error;
use std::fmt;
use validator::ValidationErrors;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every error response.
#[derive(Serialize, Debug)]
pub struct ErrorMessage {
    pub code: u16,
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),

    PathError(u16, String),

    JsonRejection(JsonRejection),
    MultiPartError(MultipartError),

    ValidationError(ValidationErrors),

    Sqlx(sqlx::Error),

    Upload(UploadError),

    Anyhow(anyhow::Error),

    Any(ErrorMessage),
}

impl ApiError {
    fn code(&self) -> u16 {
        use ApiError::*;

        match self {
            BadRequest(_) => 400,
            NotFound(_) => 404,
            PathError(code, _) => *code,
            JsonRejection(_) | ValidationError(_) => 400,
            Sqlx(_) | Upload(_) | Anyhow(_) => 500,
            MultiPartError(inner) => inner.status().as_u16(),
            Any(message) => message.code,
        }
    }

    fn message(&self) -> String {
        use ApiError::*;

        match self {
            BadRequest(msg) | NotFound(msg) => msg.clone(),
            PathError(_, msg) => msg.clone(),
            JsonRejection(error) => error.body_text(),
            MultiPartError(error) => error.body_text(),
            ValidationError(err) => err.to_string().replace('\n', "; "),
            Sqlx(err) => err.to_string(),
            Upload(err) => err.to_string(),
            Anyhow(err) => format!("{:#}", err),
            Any(msg) => msg.message.clone(),
        }
    }

    fn to_default_json(&self) -> Response {
        self.to_json(self.code(), &self.message())
    }

    fn to_json(&self, code: u16, message: &str) -> Response {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error = match self {
            ApiError::Any(msg) => msg.error.clone(),
            _ => reason(status).to_string(),
        };
        (
            status,
            Json(ErrorMessage {
                code: status.as_u16(),
                error,
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            Sqlx(ref error) => {
                tracing::error!("sqlx error: {:?}", error);
                match error {
                    sqlx::Error::Database(dbe) => {
                        let constraint = match dbe.kind() {
                            ErrorKind::ForeignKeyViolation => Some("Missing related record"),
                            ErrorKind::UniqueViolation => Some("Unique value already in use"),
                            ErrorKind::NotNullViolation => Some("Missing required field"),
                            ErrorKind::CheckViolation => Some("Invalid input value"),
                            _ => None,
                        };
                        match constraint {
                            Some(what) => self.to_json(500, &format!("{}: {}", what, dbe.message())),
                            None => self.to_default_json(),
                        }
                    }
                    sqlx::Error::RowNotFound => self.to_json(404, "Data not found"),
                    _ => self.to_default_json(),
                }
            }
            Upload(ref error) => {
                tracing::error!("upload error: {:?}", error);
                self.to_default_json()
            }
            Anyhow(ref error) => {
                tracing::error!("generic error: {:?}", error);
                self.to_default_json()
            }
            _ => self.to_default_json(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ApiError::*;
        match self {
            JsonRejection(err) => Some(err),
            MultiPartError(err) => Some(err),
            ValidationError(err) => Some(err),
            Sqlx(err) => Some(err),
            Upload(err) => Some(err),
            Anyhow(err) => err.source(),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Sqlx(err)
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Upload(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Anyhow(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::JsonRejection(rejection)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::MultiPartError(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::ValidationError(err)
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown error")
}

pub fn bad_request(msg: &str) -> ApiError {
    ApiError::BadRequest(msg.to_string())
}

pub fn not_found(msg: &str) -> ApiError {
    ApiError::NotFound(msg.to_string())
}

pub fn any_error(code: u16, error: &str, message: Option<&str>) -> ApiError {
    ApiError::Any(ErrorMessage {
        code,
        error: error.to_string(),
        message: message.unwrap_or(error).to_string(),
    })
}
