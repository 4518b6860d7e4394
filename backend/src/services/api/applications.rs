//! # Public Application Endpoints
//!
//! Backs `GET /api/v1/applications` and `GET /api/v1/applications/{id}`.
//!
//! ## Workflow
//!
//! 1.  **Query parsing**: `sort` is parsed into a `Selection` (`recent` when
//!     absent) and `category_id` narrows the query to one category.
//! 2.  **Database query**: `db::applications::query` applies the selection's
//!     filter and ordering; every row comes back with its bound attachments.
//! 3.  **Serialization**: the `CatalogSerializer` resolves icons, download
//!     URLs and file sizes, and nests the minimal owning category.

use crate::db::{applications, categories};
use crate::error::{CatalogError, CatalogResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::ApplicationListQuery;
use common::selection::{ApplicationQuery, Selection};

/// `GET /api/v1/applications?category_id=&sort=`
///
/// Defaults to the `recent` selection. An unknown `sort` is a 400.
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<ApplicationListQuery>,
) -> CatalogResult<HttpResponse> {
    let selection = match params.sort.as_deref() {
        None | Some("") => Selection::default(),
        Some(sort) => sort.parse().map_err(CatalogError::BadRequest)?,
    };
    let mut query = ApplicationQuery::default().with_selection(selection);
    if let Some(category_id) = params.category_id {
        query = query.by_category(category_id);
    }

    let conn = state.db.connect()?;
    let apps = applications::query(&conn, &query)?;
    let cats = categories::ordered(&conn)?;
    Ok(HttpResponse::Ok().json(state.serializer().applications(&apps, &cats)))
}

/// `GET /api/v1/applications/{id}`
///
/// # Arguments
/// * `id` - The application id, extracted from the URL path.
///
/// # Returns
/// - `200 OK` with the detail view: category with slug, screenshots and
///   timestamps.
/// - `404 Not Found` when no such application exists.
pub async fn show(state: web::Data<AppState>, id: web::Path<i64>) -> CatalogResult<HttpResponse> {
    let id = id.into_inner();
    let conn = state.db.connect()?;
    let app = applications::find(&conn, id)?
        .ok_or_else(|| CatalogError::not_found(format!("application {}", id)))?;
    let category = categories::find(&conn, app.category_id)?
        .ok_or_else(|| CatalogError::not_found(format!("category {}", app.category_id)))?;
    Ok(HttpResponse::Ok().json(state.serializer().application_detail(&app, &category)))
}
