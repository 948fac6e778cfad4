pub mod codes;
pub mod geo;
pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Opens the configured database.
///
/// `DATABASE_PATH` may be a full DSN or a bare SQLite file path. For a file
/// path the parent directory is created and the file is opened read-write-create.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url(&config::database_path())).await
}

pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:") {
        return path_or_url.to_owned();
    }

    // SQLite won't create intermediate dirs.
    if let Some(parent) = Path::new(path_or_url).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "could not create database directory");
            }
        }
    }
    format!("sqlite://{path_or_url}?mode=rwc")
}
