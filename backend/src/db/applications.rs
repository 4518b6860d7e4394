use crate::error::{CatalogError, CatalogResult};
use chrono::Utc;
use common::model::application::Application;
use common::model::attachment::{Attachment, AttachmentKind};
use common::selection::ApplicationQuery;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

const COLUMNS: &str = "applications.id, applications.name, applications.package_name, \
    applications.version, applications.description, applications.icon, \
    applications.download_url, applications.file_size, applications.file_size_bytes, \
    applications.developer, applications.rating, applications.downloads, \
    applications.last_updated, applications.min_android_version, \
    applications.permissions, applications.features, applications.category_id, \
    applications.created_at, applications.updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        name: row.get(1)?,
        package_name: row.get(2)?,
        version: row.get(3)?,
        description: row.get(4)?,
        icon: row.get(5)?,
        download_url: row.get(6)?,
        file_size: row.get(7)?,
        file_size_bytes: row.get(8)?,
        developer: row.get(9)?,
        rating: row.get(10)?,
        downloads: row.get(11)?,
        last_updated: row.get(12)?,
        min_android_version: row.get(13)?,
        permissions: row.get(14)?,
        features: row.get(15)?,
        category_id: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
        icon_attachment: None,
        screenshots: Vec::new(),
        package: None,
    })
}

fn select(conn: &Connection, sql_tail: &str, args: Vec<Value>) -> rusqlite::Result<Vec<Application>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM applications {}", COLUMNS, sql_tail))?;
    let rows = stmt.query_map(params_from_iter(args), from_row)?;
    let mut apps = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    for app in apps.iter_mut() {
        load_attachments(conn, app)?;
    }
    Ok(apps)
}

/// Runs a composed query: optional category filter, selection filter and
/// selection ordering.
pub fn query(conn: &Connection, q: &ApplicationQuery) -> rusqlite::Result<Vec<Application>> {
    let mut clauses = Vec::new();
    let mut args = Vec::new();
    if let Some(category_id) = q.category_id {
        args.push(Value::Integer(category_id));
        clauses.push(format!("applications.category_id = ?{}", args.len()));
    }
    if let Some(filter) = q.selection.filter_sql() {
        clauses.push(filter.to_string());
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    select(
        conn,
        &format!("{} ORDER BY {}", where_sql, q.selection.order_sql()),
        args,
    )
}

/// Applications of one category in insertion order.
pub fn for_category(conn: &Connection, category_id: i64) -> rusqlite::Result<Vec<Application>> {
    select(
        conn,
        "WHERE applications.category_id = ?1 ORDER BY applications.id ASC",
        vec![Value::Integer(category_id)],
    )
}

/// Every application in insertion order.
pub fn all(conn: &Connection) -> rusqlite::Result<Vec<Application>> {
    select(conn, "ORDER BY applications.id ASC", Vec::new())
}

pub fn page(conn: &Connection, limit: u32, offset: u32) -> rusqlite::Result<Vec<Application>> {
    select(
        conn,
        "ORDER BY applications.id ASC LIMIT ?1 OFFSET ?2",
        vec![Value::Integer(limit.into()), Value::Integer(offset.into())],
    )
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))
}

pub fn find(conn: &Connection, id: i64) -> rusqlite::Result<Option<Application>> {
    let app = conn
        .query_row(
            &format!("SELECT {} FROM applications WHERE applications.id = ?1", COLUMNS),
            params![id],
            from_row,
        )
        .optional()?;
    match app {
        Some(mut app) => {
            load_attachments(conn, &mut app)?;
            Ok(Some(app))
        }
        None => Ok(None),
    }
}

fn load_attachments(conn: &Connection, app: &mut Application) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, kind, blob_key, filename, content_type, byte_size
         FROM attachments WHERE application_id = ?1 ORDER BY position ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![app.id], |row| {
        let kind: String = row.get(1)?;
        let byte_size: i64 = row.get(5)?;
        Ok((
            AttachmentKind::parse(&kind),
            Attachment {
                id: row.get(0)?,
                blob_key: row.get(2)?,
                filename: row.get(3)?,
                content_type: row.get(4)?,
                byte_size: u64::try_from(byte_size).unwrap_or(0),
            },
        ))
    })?;

    app.icon_attachment = None;
    app.package = None;
    app.screenshots.clear();
    for row in rows {
        match row? {
            (Some(AttachmentKind::Icon), att) => app.icon_attachment = Some(att),
            (Some(AttachmentKind::Package), att) => app.package = Some(att),
            (Some(AttachmentKind::Screenshot), att) => app.screenshots.push(att),
            (None, att) => log::warn!("attachment {} has an unknown kind", att.id),
        }
    }
    Ok(())
}

/// Inserts the application and its attachments in one transaction.
pub fn insert(conn: &mut Connection, app: &mut Application) -> CatalogResult<()> {
    app.rating = app.rating.map(round_rating);
    app.validate()?;
    let now = Utc::now();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO applications (name, package_name, version, description, icon, download_url,
             file_size, file_size_bytes, developer, rating, downloads, last_updated,
             min_android_version, permissions, features, category_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)",
        params![
            app.name,
            app.package_name,
            app.version,
            app.description,
            app.icon,
            app.download_url,
            app.file_size,
            app.file_size_bytes,
            app.developer,
            app.rating,
            app.downloads,
            app.last_updated,
            app.min_android_version,
            app.permissions,
            app.features,
            app.category_id,
            now
        ],
    )
    .map_err(CatalogError::from_constraint)?;
    app.id = tx.last_insert_rowid();
    save_new_attachments(&tx, app)?;
    tx.commit()?;
    app.created_at = now;
    app.updated_at = now;
    Ok(())
}

/// Writes every attribute and any newly bound attachments in one
/// transaction, so readers never see the size columns out of step with the
/// bound package.
pub fn update(conn: &mut Connection, app: &mut Application) -> CatalogResult<()> {
    app.rating = app.rating.map(round_rating);
    app.validate()?;
    let now = Utc::now();
    let tx = conn.transaction()?;
    let changed = tx
        .execute(
            "UPDATE applications SET name = ?1, package_name = ?2, version = ?3, description = ?4,
                 icon = ?5, download_url = ?6, file_size = ?7, file_size_bytes = ?8,
                 developer = ?9, rating = ?10, downloads = ?11, last_updated = ?12,
                 min_android_version = ?13, permissions = ?14, features = ?15,
                 category_id = ?16, updated_at = ?17
             WHERE id = ?18",
            params![
                app.name,
                app.package_name,
                app.version,
                app.description,
                app.icon,
                app.download_url,
                app.file_size,
                app.file_size_bytes,
                app.developer,
                app.rating,
                app.downloads,
                app.last_updated,
                app.min_android_version,
                app.permissions,
                app.features,
                app.category_id,
                now,
                app.id
            ],
        )
        .map_err(CatalogError::from_constraint)?;
    if changed == 0 {
        return Err(CatalogError::not_found(format!("application {}", app.id)));
    }
    save_new_attachments(&tx, app)?;
    tx.commit()?;
    app.updated_at = now;
    Ok(())
}

/// Persists attachments that have not been stored yet (`id == 0`). A new
/// icon or package replaces the previous one; new screenshots are appended.
fn save_new_attachments(tx: &Transaction<'_>, app: &mut Application) -> rusqlite::Result<()> {
    let app_id = app.id;
    if let Some(icon) = app.icon_attachment.as_mut().filter(|a| a.id == 0) {
        replace_single(tx, app_id, AttachmentKind::Icon, icon)?;
    }
    if let Some(package) = app.package.as_mut().filter(|a| a.id == 0) {
        replace_single(tx, app_id, AttachmentKind::Package, package)?;
    }
    for shot in app.screenshots.iter_mut().filter(|a| a.id == 0) {
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM attachments
             WHERE application_id = ?1 AND kind = ?2",
            params![app_id, AttachmentKind::Screenshot.as_str()],
            |row| row.get(0),
        )?;
        insert_attachment(tx, app_id, AttachmentKind::Screenshot, shot, position)?;
    }
    Ok(())
}

fn replace_single(
    tx: &Transaction<'_>,
    app_id: i64,
    kind: AttachmentKind,
    attachment: &mut Attachment,
) -> rusqlite::Result<()> {
    tx.execute(
        "DELETE FROM attachments WHERE application_id = ?1 AND kind = ?2",
        params![app_id, kind.as_str()],
    )?;
    insert_attachment(tx, app_id, kind, attachment, 0)
}

fn insert_attachment(
    tx: &Transaction<'_>,
    app_id: i64,
    kind: AttachmentKind,
    attachment: &mut Attachment,
    position: i64,
) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO attachments (application_id, kind, blob_key, filename, content_type,
             byte_size, position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            app_id,
            kind.as_str(),
            attachment.blob_key,
            attachment.filename,
            attachment.content_type,
            i64::try_from(attachment.byte_size).unwrap_or(i64::MAX),
            position,
            Utc::now()
        ],
    )?;
    attachment.id = tx.last_insert_rowid();
    Ok(())
}

/// Ratings are kept to two decimal places.
fn round_rating(rating: f64) -> f64 {
    (rating * 100.0).round() / 100.0
}

/// Deletes an application; its attachment rows go with it.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    Ok(conn.execute("DELETE FROM applications WHERE id = ?1", params![id])? > 0)
}
