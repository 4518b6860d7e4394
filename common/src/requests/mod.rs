//! Request payloads accepted by the catalog server.
//!
//! The admin forms list exactly the attributes an administrator may set;
//! anything else in a submitted payload is ignored by deserialization.

use crate::file_size::format_file_size;
use crate::list_field;
use crate::model::application::Application;
use crate::model::category::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Admin create/update payload for a category. Absent fields keep their
/// current value on update.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i64>,
}

impl CategoryForm {
    /// Copies the submitted attributes onto `category`. The slug is not
    /// touched here; it depends on the other categories and is assigned by
    /// the persistence layer.
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.trim().to_string();
        }
        if let Some(icon) = &self.icon {
            category.icon = presence(icon);
        }
        if let Some(description) = &self.description {
            category.description = presence(description);
        }
        if let Some(display_order) = self.display_order {
            category.display_order = display_order;
        }
    }
}

/// Admin create/update payload for an application (the `json` part of the
/// multipart form). Absent fields keep their current value on update; the
/// nullable numeric and date fields are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApplicationForm {
    pub name: Option<String>,
    pub package_name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub download_url: Option<String>,
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_with::rust::double_option")]
    pub file_size_bytes: Option<Option<i64>>,
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_with::rust::double_option")]
    pub rating: Option<Option<f64>>,
    pub downloads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_with::rust::double_option")]
    pub last_updated: Option<Option<NaiveDate>>,
    pub min_android_version: Option<String>,
    /// A JSON list of strings, or raw stored text.
    pub permissions: Option<Value>,
    /// A JSON list of strings, or raw stored text.
    pub features: Option<Value>,
    pub category_id: Option<i64>,
}

impl ApplicationForm {
    pub fn apply_to(&self, app: &mut Application) {
        if let Some(name) = &self.name {
            app.name = name.trim().to_string();
        }
        if let Some(package_name) = &self.package_name {
            app.package_name = package_name.trim().to_string();
        }
        assign(&mut app.version, &self.version);
        assign(&mut app.description, &self.description);
        assign(&mut app.icon, &self.icon);
        assign(&mut app.download_url, &self.download_url);
        assign(&mut app.file_size, &self.file_size);
        assign(&mut app.developer, &self.developer);
        assign(&mut app.min_android_version, &self.min_android_version);
        if let Some(bytes) = self.file_size_bytes {
            app.file_size_bytes = bytes;
            // The size string follows the byte count unless it was submitted too.
            if self.file_size.is_none() {
                match bytes {
                    Some(b) => {
                        if let Ok(b) = u64::try_from(b) {
                            app.file_size = Some(format_file_size(Some(b)));
                        }
                    }
                    None => app.file_size = None,
                }
            }
        }
        if let Some(rating) = self.rating {
            app.rating = rating;
        }
        if let Some(downloads) = self.downloads {
            app.downloads = downloads;
        }
        if let Some(last_updated) = self.last_updated {
            app.last_updated = last_updated;
        }
        if let Some(category_id) = self.category_id {
            app.category_id = category_id;
        }
        if let Some(stored) = self.permissions.as_ref().and_then(stored_list) {
            app.permissions = stored;
        }
        if let Some(stored) = self.features.as_ref().and_then(stored_list) {
            app.features = stored;
        }
    }
}

/// Query string of `GET /api/v1/applications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub category_id: Option<i64>,
    pub sort: Option<String>,
}

/// Query string of the paged admin listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per: Option<u32>,
}

impl PageQuery {
    /// `(limit, offset)` for a 1-based page of `default_per` rows.
    pub fn limit_offset(&self, default_per: u32) -> (u32, u32) {
        let per = self.per.filter(|p| *p > 0).unwrap_or(default_per).min(100);
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        (per, (page - 1).saturating_mul(per))
    }
}

fn presence(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn assign(target: &mut Option<String>, submitted: &Option<String>) {
    if let Some(value) = submitted {
        *target = presence(value);
    }
}

/// New stored text for a list column, or `None` to leave it unchanged.
/// Lists go through the list codec; strings are stored verbatim; any other
/// value is ignored.
fn stored_list(value: &Value) -> Option<Option<String>> {
    match value {
        Value::String(raw) => Some(presence(raw)),
        Value::Null => None,
        other => list_field::encode_value(other).map(Some),
    }
}
