//! Error type shared by the HTTP handlers and the persistence layer.
//!
//! Validation and lookup failures are reported to the caller; storage
//! failures surface as `503 Service Unavailable`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::blob::BlobError;
use common::error::ValidationErrors;
use serde_json::json;
use thiserror::Error;

pub type CatalogResult<T, E = CatalogError> = Result<T, E>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0} not found")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("upload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CatalogError::NotFound(what.into())
    }

    /// Maps a unique-constraint violation on one of the catalog's unique
    /// columns to a validation error on that attribute. Other database
    /// errors pass through unchanged.
    pub fn from_constraint(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation && message.contains("UNIQUE") {
                for (column, field) in [
                    ("applications.package_name", "package_name"),
                    ("categories.name", "name"),
                    ("categories.slug", "slug"),
                ] {
                    if message.contains(column) {
                        return ValidationErrors::single(field, "has already been taken").into();
                    }
                }
            }
            if code.code == rusqlite::ErrorCode::ConstraintViolation && message.contains("FOREIGN KEY") {
                return ValidationErrors::single("category", "must exist").into();
            }
        }
        CatalogError::Database(err)
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CatalogError::BadRequest(_) | CatalogError::Multipart(_) | CatalogError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            CatalogError::Database(_) | CatalogError::Blob(_) | CatalogError::Io(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CatalogError::Validation(errors) => HttpResponse::UnprocessableEntity().json(errors),
            other => {
                if other.status_code().is_server_error() {
                    log::error!("{}", other);
                }
                HttpResponse::build(other.status_code()).json(json!({ "error": other.to_string() }))
            }
        }
    }
}
