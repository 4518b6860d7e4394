//! Turns the stored references of an application into presentation-ready
//! values: the authoritative download URL, the icon and the screenshots.
//!
//! Every lookup here is infallible from the caller's point of view. Each
//! stage of a fallback chain yields an `Option`; failures are logged and the
//! next stage is tried, ending in a value that is always usable (possibly
//! empty).

use crate::blob::BlobStore;
use crate::model::application::Application;
use crate::model::attachment::Attachment;
use crate::url::{UrlContext, UrlError};
use log::warn;

pub struct DownloadResolver<'a> {
    store: &'a dyn BlobStore,
    url_context: Option<&'a UrlContext>,
}

impl<'a> DownloadResolver<'a> {
    /// `url_context` is `None` when default URL options are not configured;
    /// package URLs then degrade to relative paths.
    pub fn new(store: &'a dyn BlobStore, url_context: Option<&'a UrlContext>) -> Self {
        Self { store, url_context }
    }

    /// The single URL a client should download the application from.
    ///
    /// Order: the package's absolute URL, the package's relative path, the
    /// `download_url` field, and finally an empty string.
    pub fn download_url(&self, app: &Application) -> String {
        app.package
            .as_ref()
            .and_then(|package| {
                self.absolute_url(app.id, package)
                    .or_else(|| self.relative_path(app.id, package))
            })
            .or_else(|| app.download_url.clone().filter(|url| !url.trim().is_empty()))
            .unwrap_or_default()
    }

    /// The bound icon's path, else the raw `icon` value (emoji, URL or path).
    pub fn icon(&self, app: &Application) -> Option<String> {
        app.icon_attachment
            .as_ref()
            .and_then(|icon| self.relative_path(app.id, icon))
            .or_else(|| app.icon.clone())
    }

    /// Paths of the bound screenshots in binding order. Screenshots whose
    /// blob cannot be located are skipped.
    pub fn screenshots(&self, app: &Application) -> Vec<String> {
        app.screenshots
            .iter()
            .filter_map(|shot| self.relative_path(app.id, shot))
            .collect()
    }

    /// The stored human-readable size, falling back to one computed from the
    /// stored byte count.
    pub fn file_size(&self, app: &Application) -> Option<String> {
        app.file_size.clone().or_else(|| {
            app.file_size_bytes
                .and_then(|b| u64::try_from(b).ok())
                .map(|b| crate::file_size::format_file_size(Some(b)))
        })
    }

    fn absolute_url(&self, app_id: i64, attachment: &Attachment) -> Option<String> {
        match self.store.url_for(attachment) {
            Ok(Some(url)) => return Some(url),
            Ok(None) => {}
            Err(e) => {
                warn!("application {}: blob url lookup failed: {}", app_id, e);
                return None;
            }
        }

        let path = self.relative_path(app_id, attachment)?;
        let synthesized = self
            .url_context
            .ok_or(UrlError::Unconfigured)
            .and_then(|ctx| ctx.absolute_url(&path));
        match synthesized {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("application {}: cannot build absolute package url: {}", app_id, e);
                None
            }
        }
    }

    fn relative_path(&self, app_id: i64, attachment: &Attachment) -> Option<String> {
        match self.store.path_for(attachment) {
            Ok(path) if !path.is_empty() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("application {}: blob path lookup failed: {}", app_id, e);
                None
            }
        }
    }
}
