//! # Admin API
//!
//! Create/read/update/delete for categories and applications. Request bodies
//! carry exactly the attributes an administrator may set; anything else is
//! ignored. Validation failures answer `422` with the failed rules and
//! nothing is persisted.
//!
//! ## Registered Routes:
//!
//! *   **`GET /categories`**, **`GET /applications`**: paged listings
//!     (`page`, `per`; 10 rows per page by default).
//! *   **`GET /categories/{id}`**, **`GET /applications/{id}`**: one record.
//! *   **`POST /categories`**, **`PUT /categories/{id}`**: JSON `CategoryForm`.
//! *   **`POST /applications`**, **`PUT /applications/{id}`**: multipart with a
//!     `json` part (`ApplicationForm`) and optional `package`, `icon` and
//!     `screenshots` file parts.
//! *   **`POST /applications/{id}/package`**: rebinds the package only.
//! *   **`DELETE /categories/{id}`**: also deletes the category's applications.
//! *   **`DELETE /applications/{id}`**.

mod applications;
mod categories;
mod upload;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/admin";

/// Rows per page of the admin listings.
const PER_PAGE: u32 = 10;

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/categories", get().to(categories::list))
        .route("/categories", post().to(categories::create))
        .route("/categories/{id}", get().to(categories::show))
        .route("/categories/{id}", put().to(categories::update))
        .route("/categories/{id}", delete().to(categories::destroy))
        .route("/applications", get().to(applications::list))
        .route("/applications", post().to(applications::create))
        .route("/applications/{id}", get().to(applications::show))
        .route("/applications/{id}", put().to(applications::update))
        .route("/applications/{id}", delete().to(applications::destroy))
        .route("/applications/{id}/package", post().to(applications::attach_package))
}
