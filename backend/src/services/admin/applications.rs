//! # Admin Application Management
//!
//! Handlers behind `/admin/applications`.
//!
//! ## Workflow
//!
//! 1.  **Upload**: writes arrive as multipart bodies. `read_upload` parses the
//!     `json` part into an `ApplicationForm` and streams file parts into the
//!     blob store before any row is touched.
//! 2.  **Apply**: the form attributes are copied onto the application, then
//!     the uploaded icon, screenshots and package are bound. Binding a
//!     package recomputes `file_size` and `file_size_bytes`.
//! 3.  **Persist**: `db::applications::insert`/`update` validate and write the
//!     row and its new attachments in one transaction. A failed rule answers
//!     `422` and nothing is saved.
//! 4.  **Respond**: the stored application is returned in its detail shape.

use super::upload::read_upload;
use super::PER_PAGE;
use crate::db::{applications, categories};
use crate::error::{CatalogError, CatalogResult};
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::error::ValidationErrors;
use common::model::application::Application;
use common::requests::PageQuery;
use log::info;
use rusqlite::Connection;
use serde_json::json;

/// `GET /admin/applications?page=&per=`
///
/// # Returns
/// - `200 OK` with `total`, `page`, `per` and one page of applications in
///   creation order.
pub async fn list(state: web::Data<AppState>, page: web::Query<PageQuery>) -> CatalogResult<HttpResponse> {
    let (limit, offset) = page.limit_offset(PER_PAGE);
    let conn = state.db.connect()?;
    let apps = applications::page(&conn, limit, offset)?;
    let cats = categories::ordered(&conn)?;
    Ok(HttpResponse::Ok().json(json!({
        "total": applications::count(&conn)?,
        "page": page.page.unwrap_or(1).max(1),
        "per": limit,
        "applications": state.serializer().applications(&apps, &cats),
    })))
}

/// `GET /admin/applications/{id}`; `404` when missing.
pub async fn show(state: web::Data<AppState>, id: web::Path<i64>) -> CatalogResult<HttpResponse> {
    let conn = state.db.connect()?;
    let app = load(&conn, id.into_inner())?;
    detail_response(&state, &conn, &app, HttpResponse::Ok())
}

/// Creates an application from a multipart form. The `json` part is
/// required and must name the owning `category_id`.
pub async fn create(state: web::Data<AppState>, payload: Multipart) -> CatalogResult<HttpResponse> {
    let upload = read_upload(payload, &state.blobs, state.upload_limit_bytes).await?;
    let category_id = match upload.form.as_ref() {
        None => return Err(CatalogError::BadRequest("missing json part".to_string())),
        Some(form) => form
            .category_id
            .ok_or_else(|| ValidationErrors::single("category", "must exist"))?,
    };

    let mut app = Application::new(category_id);
    upload.apply_to(&mut app);

    let mut conn = state.db.connect()?;
    applications::insert(&mut conn, &mut app)?;
    info!("created application {} ({})", app.id, app.package_name);
    detail_response(&state, &conn, &app, HttpResponse::Created())
}

/// `PUT /admin/applications/{id}`
///
/// Absent form fields keep their values. A new icon or package replaces the
/// old one; new screenshots are appended.
///
/// # Returns
/// - `200 OK` with the updated detail view.
/// - `404 Not Found` for an unknown id, `422` when a rule fails.
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    payload: Multipart,
) -> CatalogResult<HttpResponse> {
    let upload = read_upload(payload, &state.blobs, state.upload_limit_bytes).await?;
    let mut conn = state.db.connect()?;
    let mut app = load(&conn, id.into_inner())?;
    upload.apply_to(&mut app);
    applications::update(&mut conn, &mut app)?;
    detail_response(&state, &conn, &app, HttpResponse::Ok())
}

/// Binds a new package (`package` file part) and recomputes the file size
/// columns in the same write.
pub async fn attach_package(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    payload: Multipart,
) -> CatalogResult<HttpResponse> {
    let upload = read_upload(payload, &state.blobs, state.upload_limit_bytes).await?;
    let package = upload
        .package
        .ok_or_else(|| ValidationErrors::single("package", "can't be blank"))?;

    let mut conn = state.db.connect()?;
    let mut app = load(&conn, id.into_inner())?;
    app.bind_package(package);
    applications::update(&mut conn, &mut app)?;
    info!(
        "bound package to application {} ({})",
        app.id,
        app.file_size.as_deref().unwrap_or("0 B")
    );
    detail_response(&state, &conn, &app, HttpResponse::Ok())
}

/// `DELETE /admin/applications/{id}`. Attachment rows are removed with the
/// application; blob files stay, since identical uploads share them.
pub async fn destroy(state: web::Data<AppState>, id: web::Path<i64>) -> CatalogResult<HttpResponse> {
    let id = id.into_inner();
    let conn = state.db.connect()?;
    if !applications::delete(&conn, id)? {
        return Err(CatalogError::not_found(format!("application {}", id)));
    }
    info!("deleted application {}", id);
    Ok(HttpResponse::NoContent().finish())
}

/// Loads one application with its attachments or reports it as not found.
fn load(conn: &Connection, id: i64) -> CatalogResult<Application> {
    applications::find(conn, id)?.ok_or_else(|| CatalogError::not_found(format!("application {}", id)))
}

/// Serializes `app` in its detail shape with the given status builder.
fn detail_response(
    state: &AppState,
    conn: &Connection,
    app: &Application,
    mut builder: actix_web::HttpResponseBuilder,
) -> CatalogResult<HttpResponse> {
    let category = categories::find(conn, app.category_id)?
        .ok_or_else(|| CatalogError::not_found(format!("category {}", app.category_id)))?;
    Ok(builder.json(state.serializer().application_detail(app, &category)))
}
