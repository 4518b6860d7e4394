//! Catalog core shared by the server: entities, derived-value resolution and
//! the public JSON shapes.

pub mod blob;
pub mod error;
pub mod file_size;
pub mod list_field;
pub mod model;
pub mod requests;
pub mod resolver;
pub mod selection;
pub mod url;
pub mod views;
