use crate::error::ValidationErrors;
use crate::file_size::format_file_size;
use crate::list_field;
use crate::model::attachment::Attachment;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// One installable catalog entry.
///
/// `permissions` and `features` hold the stored JSON text; use the
/// `*_array` accessors to read them as lists. Bound blobs are carried as
/// typed optional values: `package.is_some()` is the "has a package" check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub package_name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub download_url: Option<String>,
    pub file_size: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub developer: Option<String>,
    pub rating: Option<f64>,
    pub downloads: i64,
    pub last_updated: Option<NaiveDate>,
    pub min_android_version: Option<String>,
    pub permissions: Option<String>,
    pub features: Option<String>,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub icon_attachment: Option<Attachment>,
    pub screenshots: Vec<Attachment>,
    pub package: Option<Attachment>,
}

impl Application {
    /// A blank record owned by `category_id`, timestamps set to now.
    pub fn new(category_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            package_name: String::new(),
            version: None,
            description: None,
            icon: None,
            download_url: None,
            file_size: None,
            file_size_bytes: None,
            developer: None,
            rating: None,
            downloads: 0,
            last_updated: None,
            min_android_version: None,
            permissions: None,
            features: None,
            category_id,
            created_at: now,
            updated_at: now,
            icon_attachment: None,
            screenshots: Vec::new(),
            package: None,
        }
    }

    /// Decoded permissions. Corrupt or legacy stored text reads as empty.
    pub fn permissions_array(&self) -> Vec<String> {
        lenient_decode("permissions", self.id, self.permissions.as_deref())
    }

    /// Decoded features. Corrupt or legacy stored text reads as empty.
    pub fn features_array(&self) -> Vec<String> {
        lenient_decode("features", self.id, self.features.as_deref())
    }

    pub fn set_permissions_array(&mut self, items: &[String]) {
        self.permissions = Some(list_field::encode(items));
    }

    pub fn set_features_array(&mut self, items: &[String]) {
        self.features = Some(list_field::encode(items));
    }

    /// Whether a non-blank external download URL is set.
    pub fn has_download_url(&self) -> bool {
        self.download_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Binds a new installable package and recomputes both size columns from
    /// it, so they always describe the same blob.
    pub fn bind_package(&mut self, package: Attachment) {
        self.file_size_bytes = i64::try_from(package.byte_size).ok();
        self.file_size = Some(format_file_size(Some(package.byte_size)));
        self.package = Some(package);
    }

    /// Checks the per-record invariants, including the cross-field rule that
    /// a download source must exist. `package_name` uniqueness is enforced
    /// by the persistence layer.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "can't be blank");
        }
        if self.package_name.trim().is_empty() {
            errors.add("package_name", "can't be blank");
        }
        if self.downloads < 0 {
            errors.add("downloads", "must be greater than or equal to 0");
        }
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                errors.add("rating", "must be between 0 and 5");
            }
        }
        if let Some(bytes) = self.file_size_bytes {
            if bytes < 0 {
                errors.add("file_size_bytes", "must be greater than or equal to 0");
            }
        }
        if self.package.is_none() && !self.has_download_url() {
            errors.add("base", "must have download source (package file or download url)");
        }
        errors.into_result()
    }
}

fn lenient_decode(field: &str, id: i64, stored: Option<&str>) -> Vec<String> {
    list_field::decode(stored).unwrap_or_else(|e| {
        debug!("application {} has unreadable {}: {}", id, field, e);
        Vec::new()
    })
}
