//! SQLite persistence for categories, applications and their attachments.
//!
//! Each request opens its own connection to the database file; foreign keys
//! are switched on for every connection so that deleting a category cascades
//! to its applications, and deleting an application to its attachments.

pub mod applications;
pub mod categories;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL UNIQUE,
    slug          TEXT    NOT NULL UNIQUE,
    icon          TEXT,
    description   TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT    NOT NULL,
    updated_at    TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS index_categories_on_display_order ON categories (display_order);

CREATE TABLE IF NOT EXISTS applications (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    name                TEXT    NOT NULL,
    package_name        TEXT    NOT NULL UNIQUE,
    version             TEXT,
    description         TEXT,
    icon                TEXT,
    download_url        TEXT,
    file_size           TEXT,
    file_size_bytes     INTEGER,
    developer           TEXT,
    rating              REAL,
    downloads           INTEGER NOT NULL DEFAULT 0,
    last_updated        TEXT,
    min_android_version TEXT,
    permissions         TEXT,
    features            TEXT,
    category_id         INTEGER NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
    created_at          TEXT    NOT NULL,
    updated_at          TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS index_applications_on_category_id ON applications (category_id);
CREATE INDEX IF NOT EXISTS index_applications_on_downloads ON applications (downloads);
CREATE INDEX IF NOT EXISTS index_applications_on_rating ON applications (rating);

CREATE TABLE IF NOT EXISTS attachments (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    application_id INTEGER NOT NULL REFERENCES applications (id) ON DELETE CASCADE,
    kind           TEXT    NOT NULL,
    blob_key       TEXT    NOT NULL,
    filename       TEXT    NOT NULL,
    content_type   TEXT,
    byte_size      INTEGER NOT NULL,
    position       INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS index_attachments_on_application_id ON attachments (application_id, kind);
"#;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a connection with foreign key enforcement enabled.
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Creates any missing tables and indexes.
    pub fn migrate(&self) -> rusqlite::Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)
    }
}
