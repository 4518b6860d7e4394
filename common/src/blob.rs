use crate::model::attachment::Attachment;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob {0} is missing from the store")]
    Missing(String),
    #[error("blob store i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Msg(String),
}

/// The retrieval side of an external blob store.
///
/// Only the lookups needed to present an attachment are modelled here; how
/// blobs get written is up to the implementation.
pub trait BlobStore: Send + Sync {
    /// A retrievable path for the attachment, relative to the serving host.
    fn path_for(&self, attachment: &Attachment) -> Result<String, BlobError>;

    /// An absolute URL, when the store itself can produce one (e.g. a CDN).
    /// `Ok(None)` means the caller has to synthesize one from the path.
    fn url_for(&self, _attachment: &Attachment) -> Result<Option<String>, BlobError> {
        Ok(None)
    }
}
