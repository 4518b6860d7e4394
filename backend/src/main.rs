use actix_web::{App, HttpServer};
use catalog_server::config::ServerConfig;
use catalog_server::db::Database;
use catalog_server::seed;
use catalog_server::state::AppState;
use catalog_server::storage::DiskBlobStore;
use env_logger::Env;
use log::{info, warn};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let db = Database::new(&config.database);
    db.migrate().map_err(|e| io::Error::other(e.to_string()))?;
    if config.seed {
        seed::seed_if_empty(&db).map_err(|e| io::Error::other(e.to_string()))?;
    }

    let blobs = DiskBlobStore::open(&config.storage_dir).map_err(|e| io::Error::other(e.to_string()))?;
    if config.url_context.is_none() {
        warn!("CATALOG_URL_HOST is not set; package download links will be relative");
    }
    let state = AppState::new(db, blobs, config.url_context.clone())
        .with_upload_limit(config.upload_limit_bytes);

    info!(
        "Server running at http://{}:{} (database {}, storage {})",
        config.bind_host,
        config.bind_port,
        config.database.display(),
        config.storage_dir.display()
    );

    HttpServer::new(move || App::new().configure(catalog_server::configure(state.clone())))
        .bind((config.bind_host.as_str(), config.bind_port))?
        .run()
        .await
}
