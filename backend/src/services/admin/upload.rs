//! Reads the multipart body of the admin application forms.
//!
//! Expected parts:
//! - `json`: the `ApplicationForm` attributes.
//! - `package`: the installable APK.
//! - `icon`: an icon image.
//! - `screenshots` (or `screenshots[]`): any number of screenshot images.
//!
//! File parts are streamed straight into the blob store while they are
//! hashed, so large packages are never held in memory. Empty file parts
//! (a form submitted without choosing a file) are skipped.

use crate::error::{CatalogError, CatalogResult};
use crate::storage::DiskBlobStore;
use actix_multipart::{Field, Multipart};
use common::error::ValidationErrors;
use common::model::application::Application;
use common::model::attachment::Attachment;
use common::requests::ApplicationForm;
use futures_util::StreamExt;
use serde_json::from_slice;

const PACKAGE_EXTENSIONS: [&str; 3] = ["apk", "apks", "xapk"];

/// Cap on the `json` part.
const JSON_LIMIT: usize = 256 * 1024;

#[derive(Debug, Default)]
pub struct ApplicationUpload {
    pub form: Option<ApplicationForm>,
    pub package: Option<Attachment>,
    pub icon: Option<Attachment>,
    pub screenshots: Vec<Attachment>,
}

impl ApplicationUpload {
    /// Applies the submitted attributes, then binds the uploaded files.
    /// Binding a package recomputes the size columns.
    pub fn apply_to(self, app: &mut Application) {
        if let Some(form) = &self.form {
            form.apply_to(app);
        }
        if let Some(icon) = self.icon {
            app.icon_attachment = Some(icon);
        }
        app.screenshots.extend(self.screenshots);
        if let Some(package) = self.package {
            app.bind_package(package);
        }
    }
}

pub async fn read_upload(
    mut payload: Multipart,
    blobs: &DiskBlobStore,
    limit: usize,
) -> CatalogResult<ApplicationUpload> {
    let mut upload = ApplicationUpload::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(|n| n.to_string()),
                cd.get_filename().map(|f| f.to_string()),
            ),
            None => (None, None),
        };

        match name.as_deref() {
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                    if bytes.len() > JSON_LIMIT {
                        return Err(CatalogError::PayloadTooLarge(JSON_LIMIT));
                    }
                }
                upload.form = Some(from_slice(&bytes)?);
            }
            Some("package") => {
                let filename = filename.unwrap_or_default();
                if filename.is_empty() {
                    drain(&mut field).await?;
                    continue;
                }
                if !has_package_extension(&filename) {
                    return Err(ValidationErrors::single("package", "must be an .apk file").into());
                }
                upload.package = store_field(&mut field, &filename, blobs, limit).await?;
            }
            Some("icon") => {
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    upload.icon = store_field(&mut field, &filename, blobs, limit).await?;
                } else {
                    drain(&mut field).await?;
                }
            }
            Some("screenshots") | Some("screenshots[]") => {
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    if let Some(shot) = store_field(&mut field, &filename, blobs, limit).await? {
                        upload.screenshots.push(shot);
                    }
                } else {
                    drain(&mut field).await?;
                }
            }
            _ => drain(&mut field).await?,
        }
    }

    Ok(upload)
}

/// Streams one file part into the blob store. Returns `None` for a part
/// with no bytes; parts larger than `limit` are rejected.
async fn store_field(
    field: &mut Field,
    filename: &str,
    blobs: &DiskBlobStore,
    limit: usize,
) -> CatalogResult<Option<Attachment>> {
    let content_type = field.content_type().map(|m| m.essence_str().to_string());
    let mut pending = blobs.begin()?;
    let mut written = 0usize;
    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                pending.abort();
                return Err(CatalogError::Multipart(e));
            }
        };
        written += chunk.len();
        if written > limit {
            pending.abort();
            return Err(CatalogError::PayloadTooLarge(limit));
        }
        if let Err(e) = pending.write_chunk(&chunk) {
            pending.abort();
            return Err(e.into());
        }
    }

    if written == 0 {
        pending.abort();
        return Ok(None);
    }
    Ok(Some(pending.finish(filename, content_type)?))
}

async fn drain(field: &mut Field) -> CatalogResult<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

fn has_package_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| PACKAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
