use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("movie not found")]
    NotFound,

    #[error("movie already registered: {0}")]
    Duplicate(String),

    #[error("catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Duplicate(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Http(err) => {
                tracing::error!(error = %err, "upstream request failed");
                (StatusCode::BAD_GATEWAY, "catalog request failed".to_string())
            },
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            },
            AppError::Json(err) => {
                tracing::error!(error = %err, "encoding error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            },
            AppError::Other(err) => {
                tracing::error!(error = %err, "unhandled error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            },
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
