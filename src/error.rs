use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Too Many Requests")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Content(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Server-side detail (paths, redb errors) stays in the log
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(#[from] redb::DatabaseError),

    #[error("transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table unavailable: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage failure: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("commit failed: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("record encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}

// Failure to turn one content file into a record
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("front matter has no slug")]
    MissingSlug,

    #[error("field `{field}` must be an integer, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid rubric json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rubric document must be a json object")]
    NotAnObject,

    #[error("unknown rubric kind {0:?}")]
    UnknownKind(String),
}
