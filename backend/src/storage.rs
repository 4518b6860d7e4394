//! Disk-backed, content-addressed blob store.
//!
//! Uploaded bytes are hashed with MD5 while they stream in and stored under
//! `<root>/<md5 hex>`. Identical uploads therefore share one file. Blobs are
//! served from `/blobs/{key}/{filename}`; the filename only names the
//! download, the key alone locates the bytes.

use common::blob::{BlobError, BlobStore};
use common::model::attachment::Attachment;
use log::info;
use md5::Context;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// URL prefix under which blobs are served.
pub const BLOB_ROUTE: &str = "/blobs";

static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    /// Opens (and creates, if needed) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a streamed upload. Bytes are written to a temporary file and
    /// moved to their content address by `PendingBlob::finish`.
    pub fn begin(&self) -> Result<PendingBlob, BlobError> {
        let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp_path = self
            .root
            .join(format!(".upload-{}-{}.part", std::process::id(), seq));
        let writer = BufWriter::new(File::create(&temp_path)?);
        Ok(PendingBlob {
            root: self.root.clone(),
            temp_path,
            writer,
            hasher: Context::new(),
            byte_size: 0,
        })
    }

    /// Stores a complete in-memory blob.
    pub fn put(&self, bytes: &[u8], filename: &str, content_type: Option<String>) -> Result<Attachment, BlobError> {
        let mut pending = self.begin()?;
        pending.write_chunk(bytes)?;
        pending.finish(filename, content_type)
    }

    /// Location of a stored blob on disk, if `key` is a well-formed content
    /// address that exists.
    pub fn locate(&self, key: &str) -> Option<PathBuf> {
        if !is_blob_key(key) {
            return None;
        }
        let path = self.root.join(key);
        path.is_file().then_some(path)
    }
}

impl BlobStore for DiskBlobStore {
    fn path_for(&self, attachment: &Attachment) -> Result<String, BlobError> {
        if self.locate(&attachment.blob_key).is_none() {
            return Err(BlobError::Missing(attachment.blob_key.clone()));
        }
        Ok(format!(
            "{}/{}/{}",
            BLOB_ROUTE,
            attachment.blob_key,
            sanitize_filename(&attachment.filename)
        ))
    }
}

/// An upload in progress.
pub struct PendingBlob {
    root: PathBuf,
    temp_path: PathBuf,
    writer: BufWriter<File>,
    hasher: Context,
    byte_size: u64,
}

impl PendingBlob {
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), BlobError> {
        self.hasher.consume(chunk);
        self.writer.write_all(chunk)?;
        self.byte_size += chunk.len() as u64;
        Ok(())
    }

    pub fn finish(mut self, filename: &str, content_type: Option<String>) -> Result<Attachment, BlobError> {
        self.writer.flush()?;
        let key = format!("{:x}", self.hasher.finalize());
        let target = self.root.join(&key);
        if target.exists() {
            fs::remove_file(&self.temp_path)?;
        } else {
            fs::rename(&self.temp_path, &target)?;
            info!("stored blob {} ({} bytes)", key, self.byte_size);
        }
        let filename = sanitize_filename(filename);
        let content_type = content_type.or_else(|| {
            mime_guess::from_path(&filename)
                .first()
                .map(|m| m.essence_str().to_string())
        });
        Ok(Attachment {
            id: 0,
            blob_key: key,
            filename,
            content_type,
            byte_size: self.byte_size,
        })
    }

    /// Drops the partially written temporary file.
    pub fn abort(self) {
        let PendingBlob { temp_path, writer, .. } = self;
        drop(writer);
        let _ = fs::remove_file(temp_path);
    }
}

fn is_blob_key(key: &str) -> bool {
    key.len() == 32 && key.chars().all(|c| c.is_ascii_hexdigit())
}

/// Reduces a client-supplied filename to a URL-safe one.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "blob".to_string()
    } else {
        cleaned.to_string()
    }
}
