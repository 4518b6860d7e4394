//! # Public Catalog API
//!
//! Read-only endpoints consumed by the glasses-side store client.
//!
//! ## Registered Routes:
//!
//! *   **`GET /categories`**: every category in listing order, each with a
//!     short summary of its applications.
//! *   **`GET /categories/{slug_or_id}`**: one category with full application
//!     objects. The slug is tried before the numeric id.
//! *   **`GET /applications`**: application list, newest first. Accepts
//!     `category_id` to filter and `sort=recent|popular|top_rated`.
//! *   **`GET /applications/{id}`**: one application with its category,
//!     screenshots and timestamps.

mod applications;
mod categories;

use actix_web::web::{get, scope};
use actix_web::Scope;

/// The base path for the public API.
const API_PATH: &str = "/api/v1";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/categories", get().to(categories::list))
        .route("/categories/{slug_or_id}", get().to(categories::show))
        .route("/applications", get().to(applications::list))
        .route("/applications/{id}", get().to(applications::show))
}
