//! Schema migration command

use std::path::Path;

use learnhub_store::migrations::applied_migrations;

pub fn execute(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_database(db_path)?;

    println!("Database: {}", db_path.display());
    for migration_id in applied_migrations(&conn)? {
        println!("  applied: {}", migration_id);
    }
    Ok(())
}
