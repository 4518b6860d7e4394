//! HTTP surface of the catalog: the public JSON API, the admin CRUD API and
//! blob downloads. Each sub-module exposes a `configure_routes` returning
//! its own scope.

pub mod admin;
pub mod api;
pub mod blobs;
