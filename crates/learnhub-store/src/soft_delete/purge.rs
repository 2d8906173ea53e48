//! Permanent removal
//!
//! Kept apart from the query builder so that destroying rows always takes an
//! explicit `use learnhub_store::soft_delete::purge::HardDelete`.

use std::collections::BTreeMap;
use std::time::Instant;

use learnhub_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use super::{OnDelete, Query, SoftDeletable, TableDef};
use crate::errors::{from_rusqlite, Result};

/// Rows removed by a hard delete, including cascaded children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub total: usize,
    /// Removed rows per entity label; labels with nothing removed are absent
    pub per_kind: BTreeMap<&'static str, usize>,
}

impl PurgeReport {
    pub fn removed(&self, label: &str) -> usize {
        self.per_kind.get(label).copied().unwrap_or(0)
    }

    fn add(&mut self, label: &'static str, n: usize) {
        if n > 0 {
            *self.per_kind.entry(label).or_default() += n;
            self.total += n;
        }
    }
}

impl std::fmt::Display for PurgeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row(s) removed", self.total)?;
        if !self.per_kind.is_empty() {
            let parts: Vec<String> = self
                .per_kind
                .iter()
                .map(|(label, n)| format!("{}: {}", label, n))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Physically remove the selected rows
pub trait HardDelete {
    /// Delete the rows and everything the schema cascades to
    ///
    /// # Errors
    ///
    /// `ConstraintViolation` when a protected relation still references a row;
    /// nothing is removed in that case.
    fn hard_delete(&self) -> Result<PurgeReport>;
}

impl<T: SoftDeletable> HardDelete for Query<'_, T> {
    fn hard_delete(&self) -> Result<PurgeReport> {
        const OP: &str = "hard_delete";
        let table = T::table();
        self.ensure_unsliced(OP)?;

        let started = Instant::now();
        log_op_start!(OP, table = table.name, scope = self.scope().as_str());

        let (where_sql, params) = self.where_clause();
        let result = in_transaction(self.conn(), |conn| {
            purge_selection(conn, table, &where_sql, &params)
        })
        .map_err(|e| e.with_op(OP).with_entity_kind(table.label));

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    OP,
                    duration_ms = duration_ms,
                    table = table.name,
                    affected = report.total
                );
            }
            Err(e) => {
                log_op_error!(OP, e.clone(), duration_ms = duration_ms, table = table.name);
            }
        }
        result
    }
}

/// Permanently remove one record
pub fn hard_delete_record<T: SoftDeletable>(conn: &Connection, record: &T) -> Result<PurgeReport> {
    T::all_query(conn).filter_ids(&[record.id()]).hard_delete()
}

/// Run inside the caller's transaction if one is open, otherwise in our own
fn in_transaction<R>(conn: &Connection, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
    if !conn.is_autocommit() {
        return f(conn);
    }
    let tx = conn.unchecked_transaction().map_err(from_rusqlite)?;
    let value = f(&tx)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(value)
}

fn purge_selection(
    conn: &Connection,
    table: &'static TableDef,
    where_sql: &str,
    params: &[Value],
) -> Result<PurgeReport> {
    let mut report = PurgeReport::default();

    let selection = format!("SELECT id FROM {} WHERE {}", table.name, where_sql);
    count_cascade(conn, table, &selection, params, &mut report)?;

    let removed = conn
        .execute(
            &format!("DELETE FROM {} WHERE {}", table.name, where_sql),
            params_from_iter(params.iter()),
        )
        .map_err(from_rusqlite)?;
    report.add(table.label, removed);

    Ok(report)
}

/// Count rows that the DELETE of `parent_ids` will take with it
fn count_cascade(
    conn: &Connection,
    parent: &'static TableDef,
    parent_ids: &str,
    params: &[Value],
    report: &mut PurgeReport,
) -> Result<()> {
    for relation in parent.relations {
        if relation.on_delete != OnDelete::Cascade {
            continue;
        }
        let child_ids = format!(
            "SELECT id FROM {} WHERE {} IN ({})",
            relation.table.name, relation.fk_column, parent_ids
        );
        let n: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM ({})", child_ids),
                params_from_iter(params.iter()),
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        report.add(relation.table.label, n.max(0) as usize);

        count_cascade(conn, relation.table, &child_ids, params, report)?;
    }
    Ok(())
}
