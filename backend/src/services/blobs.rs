//! Serves stored blobs at `/blobs/{key}/{filename}`.
//!
//! The key locates the bytes; the filename is only used for the content type
//! and the download name.

use crate::error::{CatalogError, CatalogResult};
use crate::state::AppState;
use crate::storage::{sanitize_filename, BLOB_ROUTE};
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{get, scope};
use actix_web::{web, Scope};
use mime_guess::from_path;

pub fn configure_routes() -> Scope {
    scope(BLOB_ROUTE).route("/{key}/{filename}", get().to(process))
}

async fn process(state: web::Data<AppState>, path: web::Path<(String, String)>) -> CatalogResult<NamedFile> {
    let (key, filename) = path.into_inner();
    let file_path = state
        .blobs
        .locate(&key)
        .ok_or_else(|| CatalogError::not_found(format!("blob {}", key)))?;

    let filename = sanitize_filename(&filename);
    let mime = from_path(&filename).first_or_octet_stream();
    let disposition = if mime.type_() == mime_guess::mime::IMAGE {
        DispositionType::Inline
    } else {
        DispositionType::Attachment
    };

    Ok(NamedFile::open(file_path)?
        .set_content_type(mime)
        .set_content_disposition(ContentDisposition {
            disposition,
            parameters: vec![DispositionParam::Filename(filename)],
        }))
}
