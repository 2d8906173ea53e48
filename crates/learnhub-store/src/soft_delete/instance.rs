//! Per-record soft delete and restore
//!
//! Unlike the bulk operations these go through the direct-save path: the
//! in-memory record and its row are both updated and `updated_at` is
//! refreshed.

use std::time::Instant;

use learnhub_core::model::lifecycle::{now, to_millis, Lifecycle};
use learnhub_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{params, Connection};

use super::SoftDeletable;
use crate::errors::{from_rusqlite, record_missing, Result};

/// Soft-delete one record; an existing deletion time is kept
pub fn soft_delete_record<T: SoftDeletable>(conn: &Connection, record: &mut T) -> Result<()> {
    let mut lifecycle = record.lifecycle().clone();
    lifecycle.mark_deleted(now());
    write_lifecycle::<T>(conn, "soft_delete_record", record.id(), &lifecycle)?;
    *record.lifecycle_mut() = lifecycle;
    Ok(())
}

/// Restore one record
pub fn restore_record<T: SoftDeletable>(conn: &Connection, record: &mut T) -> Result<()> {
    let mut lifecycle = record.lifecycle().clone();
    lifecycle.mark_restored(now());
    write_lifecycle::<T>(conn, "restore_record", record.id(), &lifecycle)?;
    *record.lifecycle_mut() = lifecycle;
    Ok(())
}

fn write_lifecycle<T: SoftDeletable>(
    conn: &Connection,
    op: &'static str,
    id: i64,
    lifecycle: &Lifecycle,
) -> Result<()> {
    let table = T::table();
    let started = Instant::now();
    log_op_start!(op, table = table.name, entity_id = id);

    let sql = format!(
        "UPDATE {} SET is_deleted = ?1, deleted_at = ?2, updated_at = ?3 WHERE id = ?4",
        table.name
    );
    let result = conn
        .execute(
            &sql,
            params![
                lifecycle.is_deleted,
                lifecycle.deleted_at.map(to_millis),
                to_millis(lifecycle.updated_at),
                id
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op(op)
                .with_entity_kind(table.label)
                .with_entity_id(id.to_string())
        })
        .and_then(|updated| match updated {
            0 => Err(record_missing(op, table.label, id)),
            _ => Ok(()),
        });

    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => {
            log_op_end!(op, duration_ms = duration_ms, table = table.name, entity_id = id);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms, table = table.name);
        }
    }
    result
}
