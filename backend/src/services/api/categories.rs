//! # Public Category Endpoints
//!
//! Backs `GET /api/v1/categories` and `GET /api/v1/categories/{slug_or_id}`.
//! Both read the whole category in one connection and hand it to the
//! `CatalogSerializer`; nothing is written.

use crate::db::{applications, categories};
use crate::error::{CatalogError, CatalogResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::application::Application;
use std::collections::HashMap;

/// `GET /api/v1/categories`
///
/// Categories ordered by `display_order` then `name`, each carrying the
/// summaries of its applications in insertion order.
pub async fn list(state: web::Data<AppState>) -> CatalogResult<HttpResponse> {
    let conn = state.db.connect()?;
    let mut by_category: HashMap<i64, Vec<Application>> = HashMap::new();
    for app in applications::all(&conn)? {
        by_category.entry(app.category_id).or_default().push(app);
    }

    let entries = categories::ordered(&conn)?
        .into_iter()
        .map(|category| {
            let apps = by_category.remove(&category.id).unwrap_or_default();
            (category, apps)
        })
        .collect();

    Ok(HttpResponse::Ok().json(state.serializer().categories(entries)))
}

/// `GET /api/v1/categories/{slug_or_id}`
///
/// # Arguments
/// * `key` - A category slug or numeric id. The slug is tried first.
///
/// # Returns
/// - `200 OK` with the category and its full application objects.
/// - `404 Not Found` when neither the slug nor the id matches.
pub async fn show(state: web::Data<AppState>, key: web::Path<String>) -> CatalogResult<HttpResponse> {
    let conn = state.db.connect()?;
    let category = categories::find_by_slug_or_id(&conn, &key)?
        .ok_or_else(|| CatalogError::not_found(format!("category '{}'", key)))?;
    let apps = applications::for_category(&conn, category.id)?;
    Ok(HttpResponse::Ok().json(state.serializer().category_detail(&category, &apps)))
}
