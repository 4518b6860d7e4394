//! Smart-glasses application catalog server.
//!
//! Wires the catalog core from `common` to SQLite persistence, a disk blob
//! store and the actix-web HTTP surface.

pub mod config;
pub mod db;
pub mod error;
pub mod seed;
pub mod services;
pub mod slug;
pub mod state;
pub mod storage;

use actix_web::web;
use state::AppState;

/// Registers every route scope and the shared state on an actix `App`.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().limit(1024 * 1024))
            .service(services::api::configure_routes())
            .service(services::admin::configure_routes())
            .service(services::blobs::configure_routes());
    }
}
