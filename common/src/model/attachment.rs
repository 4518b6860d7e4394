use serde::{Deserialize, Serialize};

/// Which slot of an application a blob is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Icon,
    Screenshot,
    Package,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Icon => "icon",
            AttachmentKind::Screenshot => "screenshot",
            AttachmentKind::Package => "package",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "icon" => Some(AttachmentKind::Icon),
            "screenshot" => Some(AttachmentKind::Screenshot),
            "package" => Some(AttachmentKind::Package),
            _ => None,
        }
    }
}

/// A binary object held by the blob store and bound to an application.
///
/// `blob_key` is the store's content address; `id` is zero until the binding
/// has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub blob_key: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub byte_size: u64,
}
