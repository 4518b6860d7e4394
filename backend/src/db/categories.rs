use crate::error::{CatalogError, CatalogResult};
use crate::slug::{slugify, unique_slug};
use chrono::Utc;
use common::model::category::Category;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str =
    "id, name, slug, icon, description, display_order, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        icon: row.get(3)?,
        description: row.get(4)?,
        display_order: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// All categories in listing order: `display_order`, then `name`.
pub fn ordered(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM categories ORDER BY display_order ASC, name ASC",
        COLUMNS
    ))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

/// One page of categories in creation order, for the admin listing.
pub fn page(conn: &Connection, limit: u32, offset: u32) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM categories ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        COLUMNS
    ))?;
    let rows = stmt.query_map(params![limit, offset], from_row)?;
    rows.collect()
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
}

pub fn find(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        &format!("SELECT {} FROM categories WHERE id = ?1", COLUMNS),
        params![id],
        from_row,
    )
    .optional()
}

/// Looks a category up by slug first, then by numeric id.
pub fn find_by_slug_or_id(conn: &Connection, key: &str) -> rusqlite::Result<Option<Category>> {
    let by_slug = conn
        .query_row(
            &format!("SELECT {} FROM categories WHERE slug = ?1", COLUMNS),
            params![key],
            from_row,
        )
        .optional()?;
    match (by_slug, key.parse::<i64>()) {
        (Some(category), _) => Ok(Some(category)),
        (None, Ok(id)) => find(conn, id),
        (None, Err(_)) => Ok(None),
    }
}

fn slug_taken(conn: &Connection, slug: &str, except_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = ?1 AND id != ?2)",
        params![slug, except_id],
        |row| row.get(0),
    )
}

/// Sets `category.slug`. A slug is generated from the name when the name
/// changed or no slug is set; otherwise an explicitly requested slug is
/// normalized and used as is.
pub fn assign_slug(
    conn: &Connection,
    category: &mut Category,
    requested: Option<&str>,
    name_changed: bool,
) -> rusqlite::Result<()> {
    if name_changed || category.slug.trim().is_empty() {
        category.slug = unique_slug(&slugify(&category.name), |candidate| {
            slug_taken(conn, candidate, category.id)
        })?;
    } else if let Some(requested) = requested.filter(|s| !s.trim().is_empty()) {
        category.slug = slugify(requested);
    }
    Ok(())
}

pub fn insert(conn: &Connection, category: &mut Category) -> CatalogResult<()> {
    category.validate()?;
    let now = Utc::now();
    conn.execute(
        "INSERT INTO categories (name, slug, icon, description, display_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            category.name,
            category.slug,
            category.icon,
            category.description,
            category.display_order,
            now
        ],
    )
    .map_err(CatalogError::from_constraint)?;
    category.id = conn.last_insert_rowid();
    category.created_at = now;
    category.updated_at = now;
    Ok(())
}

pub fn update(conn: &Connection, category: &mut Category) -> CatalogResult<()> {
    category.validate()?;
    let now = Utc::now();
    let changed = conn
        .execute(
            "UPDATE categories SET name = ?1, slug = ?2, icon = ?3, description = ?4,
                 display_order = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                category.name,
                category.slug,
                category.icon,
                category.description,
                category.display_order,
                now,
                category.id
            ],
        )
        .map_err(CatalogError::from_constraint)?;
    if changed == 0 {
        return Err(CatalogError::not_found(format!("category {}", category.id)));
    }
    category.updated_at = now;
    Ok(())
}

/// Deletes a category and, through the foreign key cascade, all of its
/// applications. Returns `false` when no such category exists.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    Ok(conn.execute("DELETE FROM categories WHERE id = ?1", params![id])? > 0)
}
