//! Shared application state injected into every handler as `web::Data`.

use crate::db::Database;
use crate::storage::DiskBlobStore;
use common::resolver::DownloadResolver;
use common::url::UrlContext;
use common::views::CatalogSerializer;
use std::sync::Arc;

/// Default cap on the bytes of one uploaded file.
pub const DEFAULT_UPLOAD_LIMIT: usize = 512 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub blobs: Arc<DiskBlobStore>,
    /// Default URL options for absolute download links, if configured.
    pub url_context: Option<UrlContext>,
    pub upload_limit_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, blobs: DiskBlobStore, url_context: Option<UrlContext>) -> Self {
        Self {
            db,
            blobs: Arc::new(blobs),
            url_context,
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT,
        }
    }

    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit_bytes = bytes;
        self
    }

    pub fn resolver(&self) -> DownloadResolver<'_> {
        DownloadResolver::new(self.blobs.as_ref(), self.url_context.as_ref())
    }

    pub fn serializer(&self) -> CatalogSerializer<'_> {
        CatalogSerializer::new(self.resolver())
    }
}
