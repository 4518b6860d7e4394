//! # Admin Category Management
//!
//! Handlers behind `/admin/categories`. Bodies are JSON `CategoryForm`s;
//! fields outside the form are ignored.
//!
//! ## Workflow
//!
//! 1.  **Apply**: the submitted attributes are copied onto the category.
//! 2.  **Slug**: `db::categories::assign_slug` regenerates the slug from the
//!     name on create and on rename, adding `-2`, `-3`, ... on collision. An
//!     explicit slug is honoured only when the name is unchanged.
//! 3.  **Persist**: `insert`/`update` validate first; duplicate names or slugs
//!     come back from SQLite as `422` validation errors.

use super::PER_PAGE;
use crate::db::{applications, categories};
use crate::error::{CatalogError, CatalogResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::category::Category;
use common::requests::{CategoryForm, PageQuery};
use log::info;
use serde_json::json;

/// `GET /admin/categories?page=&per=`
///
/// # Returns
/// - `200 OK` with `total`, `page`, `per` and one page of categories, each
///   with its application summaries.
pub async fn list(state: web::Data<AppState>, page: web::Query<PageQuery>) -> CatalogResult<HttpResponse> {
    let (limit, offset) = page.limit_offset(PER_PAGE);
    let conn = state.db.connect()?;
    let serializer = state.serializer();
    let mut items = Vec::new();
    for category in categories::page(&conn, limit, offset)? {
        let apps = applications::for_category(&conn, category.id)?;
        items.push(serializer.category(&category, &apps));
    }
    Ok(HttpResponse::Ok().json(json!({
        "total": categories::count(&conn)?,
        "page": page.page.unwrap_or(1).max(1),
        "per": limit,
        "categories": items,
    })))
}

/// `GET /admin/categories/{id}`; `404` when missing.
pub async fn show(state: web::Data<AppState>, id: web::Path<i64>) -> CatalogResult<HttpResponse> {
    let conn = state.db.connect()?;
    let category = load(&conn, id.into_inner())?;
    let apps = applications::for_category(&conn, category.id)?;
    Ok(HttpResponse::Ok().json(state.serializer().category_detail(&category, &apps)))
}

/// `POST /admin/categories`
///
/// # Returns
/// - `201 Created` with the new category.
/// - `422 Unprocessable Entity` when a rule fails.
pub async fn create(state: web::Data<AppState>, form: web::Json<CategoryForm>) -> CatalogResult<HttpResponse> {
    let now = Utc::now();
    let mut category = Category {
        id: 0,
        name: String::new(),
        slug: String::new(),
        icon: None,
        description: None,
        display_order: 0,
        created_at: now,
        updated_at: now,
    };
    form.apply_to(&mut category);

    let conn = state.db.connect()?;
    categories::assign_slug(&conn, &mut category, form.slug.as_deref(), true)?;
    categories::insert(&conn, &mut category)?;
    info!("created category {} ({})", category.id, category.slug);

    Ok(HttpResponse::Created().json(state.serializer().category_detail(&category, &[])))
}

/// `PUT /admin/categories/{id}`
///
/// # Returns
/// - `200 OK` with the category and its applications.
/// - `404 Not Found` for an unknown id, `422` when a rule fails.
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    form: web::Json<CategoryForm>,
) -> CatalogResult<HttpResponse> {
    let conn = state.db.connect()?;
    let mut category = load(&conn, id.into_inner())?;
    let previous_name = category.name.clone();
    form.apply_to(&mut category);

    let name_changed = category.name != previous_name;
    categories::assign_slug(&conn, &mut category, form.slug.as_deref(), name_changed)?;
    categories::update(&conn, &mut category)?;

    let apps = applications::for_category(&conn, category.id)?;
    Ok(HttpResponse::Ok().json(state.serializer().category_detail(&category, &apps)))
}

/// Deletes the category together with all of its applications.
pub async fn destroy(state: web::Data<AppState>, id: web::Path<i64>) -> CatalogResult<HttpResponse> {
    let id = id.into_inner();
    let conn = state.db.connect()?;
    if !categories::delete(&conn, id)? {
        return Err(CatalogError::not_found(format!("category {}", id)));
    }
    info!("deleted category {}", id);
    Ok(HttpResponse::NoContent().finish())
}

/// Loads one category or reports it as not found.
fn load(conn: &rusqlite::Connection, id: i64) -> CatalogResult<Category> {
    categories::find(conn, id)?.ok_or_else(|| CatalogError::not_found(format!("category {}", id)))
}
