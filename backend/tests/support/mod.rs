//! Shared harness for the HTTP tests: a throwaway catalog (SQLite file and
//! blob directory under one temp dir) plus a multipart body builder.

#![allow(dead_code)]

use catalog_server::db::{applications, categories, Database};
use catalog_server::state::AppState;
use catalog_server::storage::DiskBlobStore;
use chrono::Utc;
use common::model::application::Application;
use common::model::category::Category;
use common::url::UrlContext;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestCatalog {
    _dir: TempDir,
    pub state: AppState,
}

impl TestCatalog {
    /// A catalog whose package links stay relative.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A catalog with default URL options, so package links are absolute.
    pub fn with_host(host: &str) -> Self {
        Self::build(Some(UrlContext::new("http".to_string(), host.to_string(), None)))
    }

    fn build(url_context: Option<UrlContext>) -> Self {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("catalog.sqlite"));
        db.migrate().unwrap();
        let blobs = DiskBlobStore::open(dir.path().join("storage")).unwrap();
        Self {
            state: AppState::new(db, blobs, url_context),
            _dir: dir,
        }
    }

    pub fn category(&self, name: &str, display_order: i64) -> Category {
        let conn = self.state.db.connect().unwrap();
        let now = Utc::now();
        let mut category = Category {
            id: 0,
            name: name.to_string(),
            slug: String::new(),
            icon: Some("🎮".to_string()),
            description: None,
            display_order,
            created_at: now,
            updated_at: now,
        };
        categories::assign_slug(&conn, &mut category, None, true).unwrap();
        categories::insert(&conn, &mut category).unwrap();
        category
    }

    /// Inserts an application with an external download URL. `tweak` runs
    /// before the insert.
    pub fn application(
        &self,
        category_id: i64,
        package_name: &str,
        tweak: impl FnOnce(&mut Application),
    ) -> Application {
        let mut conn = self.state.db.connect().unwrap();
        let mut app = Application::new(category_id);
        app.name = package_name.rsplit('.').next().unwrap_or(package_name).to_string();
        app.package_name = package_name.to_string();
        app.download_url = Some(format!("https://example.com/{package_name}.apk"));
        tweak(&mut app);
        applications::insert(&mut conn, &mut app).unwrap();
        app
    }
}

const BOUNDARY: &str = "----catalog-test-boundary";

/// Builds a `multipart/form-data` body by hand.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, value: &Value) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"json\"\r\nContent-Type: application/json\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.to_string().as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// `(content type header, body)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

pub fn md5_key(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
