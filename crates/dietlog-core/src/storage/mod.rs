mod backend;
mod sqlite;

pub use backend::StorageBackend;
pub use sqlite::SqliteStorage;

use std::path::PathBuf;

use crate::config::DietlogConfig;
use crate::error::{DietlogError, Result};

/// Open the SQLite store described by the configuration, creating the
/// parent directory and default path if needed.
pub fn open_storage(config: &DietlogConfig) -> Result<SqliteStorage> {
    let path = match &config.storage.path {
        Some(p) => PathBuf::from(p),
        None => default_db_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DietlogError::Storage(format!("failed to create data directory: {e}")))?;
    }

    tracing::debug!("opening SQLite database at {}", path.display());
    SqliteStorage::open(&path)
}

fn default_db_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| DietlogError::Config("could not determine config directory".into()))?;
    Ok(base.join("dietlog").join("dietlog.db"))
}
