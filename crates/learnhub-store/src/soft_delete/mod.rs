//! Soft-delete data access layer
//!
//! Three retrieval surfaces over the same table:
//!
//! - [`SoftDeletable::active_query`]: rows with `is_deleted = 0`, the default
//!   path for application code
//! - [`SoftDeletable::all_query`]: every row, for administrative and recovery
//!   paths
//! - [`SoftDeletable::deleted_query`]: the trash
//!
//! Bulk `delete` on any of them is a soft delete. Permanent removal is only
//! reachable through [`purge::HardDelete`], which callers import explicitly.

pub mod annotate;
pub mod instance;
pub mod purge;
mod query;

pub use annotate::Annotated;
pub use query::Query;

use chrono::{DateTime, Utc};
use learnhub_core::model::lifecycle::{from_millis, Lifecycle};
use learnhub_core::Record;
use rusqlite::{Connection, Row};

/// Which rows a query sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Active,
    All,
    Deleted,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Active => "active",
            Scope::All => "all",
            Scope::Deleted => "deleted",
        }
    }

    pub(crate) fn predicate(&self) -> Option<&'static str> {
        match self {
            Scope::Active => Some("is_deleted = 0"),
            Scope::All => None,
            Scope::Deleted => Some("is_deleted = 1"),
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Scope::Active),
            "all" => Ok(Scope::All),
            "deleted" => Ok(Scope::Deleted),
            other => Err(format!("unknown scope '{}' (expected active, all or deleted)", other)),
        }
    }
}

/// What the database does to children when a parent row is hard-deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Children are removed with the parent
    Cascade,
    /// The parent cannot be removed while children exist
    Protect,
}

/// A reverse foreign key: rows of `table` pointing at the owning table
#[derive(Debug)]
pub struct Relation {
    /// Name used in relation paths (`modules`, `modules__lessons`)
    pub name: &'static str,
    pub table: &'static TableDef,
    pub fk_column: &'static str,
    pub on_delete: OnDelete,
}

/// Static description of a soft-deletable table
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    /// Entity label (`courses.Course`)
    pub label: &'static str,
    /// Columns selected to build a record, lifecycle columns included
    pub columns: &'static [&'static str],
    pub default_order: &'static str,
    pub relations: &'static [Relation],
}

impl TableDef {
    pub fn relation(&self, name: &str) -> Option<&'static Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub(crate) fn select_list(&self) -> String {
        self.columns.join(", ")
    }
}

/// A record stored with the soft-delete convention
pub trait SoftDeletable: Record + Sized {
    fn table() -> &'static TableDef;

    /// Build a record from a row selected with `table().columns`
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Non-deleted rows
    fn active_query(conn: &Connection) -> Query<'_, Self> {
        Query::new(conn, Scope::Active)
    }

    /// Every row, deleted or not
    fn all_query(conn: &Connection) -> Query<'_, Self> {
        Query::new(conn, Scope::All)
    }

    /// Soft-deleted rows only
    fn deleted_query(conn: &Connection) -> Query<'_, Self> {
        Query::new(conn, Scope::Deleted)
    }
}

/// Read a millisecond timestamp column
pub fn timestamp_column(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(column)?;
    from_millis(ms).ok_or_else(|| out_of_range(row, column, ms))
}

/// Read a nullable millisecond timestamp column
pub fn optional_timestamp_column(
    row: &Row<'_>,
    column: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(column)? {
        Some(ms) => from_millis(ms)
            .map(Some)
            .ok_or_else(|| out_of_range(row, column, ms)),
        None => Ok(None),
    }
}

/// Read the four lifecycle columns
pub fn lifecycle_from_row(row: &Row<'_>) -> rusqlite::Result<Lifecycle> {
    Ok(Lifecycle {
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
        is_deleted: row.get("is_deleted")?,
        deleted_at: optional_timestamp_column(row, "deleted_at")?,
    })
}

fn out_of_range(row: &Row<'_>, column: &str, ms: i64) -> rusqlite::Error {
    let idx = row.as_ref().column_index(column).unwrap_or_default();
    rusqlite::Error::IntegralValueOutOfRange(idx, ms)
}
