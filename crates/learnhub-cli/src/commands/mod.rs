pub mod courses;
pub mod enrollment;
pub mod migrate;

use std::path::Path;

use learnhub_core::{ExError, ExErrorKind};
use rusqlite::Connection;

/// Open the database, creating its directory and bringing the schema up to
/// date
pub fn open_database(path: &Path) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("open_database")
                .with_message(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }
    Ok(learnhub_store::db::open_migrated(path)?)
}
