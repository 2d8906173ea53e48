//! Related-row counts
//!
//! `Query::with_counts(&["modules", "modules__lessons"])` attaches one count
//! per relation path. A path walks reverse foreign keys from the queried
//! table; the count key is the path with `__` turned into `_` plus `_count`.
//! Counts cover every related row, soft-deleted ones included.

use std::collections::BTreeMap;

use rusqlite::params_from_iter;

use super::{Query, Relation, SoftDeletable, TableDef};
use crate::errors::{from_rusqlite, invalid_query, Result};

/// A record with counts of related rows
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated<T> {
    pub record: T,
    pub counts: BTreeMap<String, u64>,
}

impl<T> Annotated<T> {
    /// Count under `key` (`modules_count`), 0 when not requested
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

/// Key a relation path's count is stored under
pub fn count_key(path: &str) -> String {
    format!("{}_count", path.replace("__", "_"))
}

impl<T: SoftDeletable> Query<'_, T> {
    /// Fetch the matched records with a count for each relation path
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a path names a relation the table does not have.
    pub fn with_counts(&self, paths: &[&str]) -> Result<Vec<Annotated<T>>> {
        let table = T::table();

        let mut expressions = Vec::with_capacity(paths.len());
        for (i, path) in paths.iter().enumerate() {
            let relations = resolve_path(table, path)?;
            expressions.push(format!("{} AS c{}", count_expression(&relations), i));
        }

        let (where_sql, params) = self.where_clause();
        let extra = expressions
            .iter()
            .map(|e| format!(", {}", e))
            .collect::<String>();
        let sql = format!(
            "SELECT {}{} FROM {} AS t0 WHERE {}{}",
            table.select_list(),
            extra,
            table.name,
            where_sql,
            self.order_and_slice()
        );

        let keys: Vec<String> = paths.iter().map(|p| count_key(p)).collect();
        let mut stmt = self.conn().prepare(&sql).map_err(from_rusqlite)?;
        let annotated = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let record = T::from_row(row)?;
                let mut counts = BTreeMap::new();
                for (i, key) in keys.iter().enumerate() {
                    let n: i64 = row.get(format!("c{}", i).as_str())?;
                    counts.insert(key.clone(), n.max(0) as u64);
                }
                Ok(Annotated { record, counts })
            })
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(annotated)
    }
}

fn resolve_path(root: &'static TableDef, path: &str) -> Result<Vec<&'static Relation>> {
    let mut current = root;
    let mut relations = Vec::new();
    for name in path.split("__") {
        let relation = current.relation(name).ok_or_else(|| {
            invalid_query(
                "with_counts",
                root.label,
                &format!("unknown relation path '{}'", path),
            )
        })?;
        relations.push(relation);
        current = relation.table;
    }
    Ok(relations)
}

/// Correlated subquery counting rows at the end of `relations`, anchored on
/// the outer row aliased `t0`
fn count_expression(relations: &[&'static Relation]) -> String {
    let mut anchor = "= t0.id".to_string();
    let last = relations.len().saturating_sub(1);
    for (depth, relation) in relations.iter().enumerate() {
        let alias = format!("t{}", depth + 1);
        let condition = format!("{}.{} {}", alias, relation.fk_column, anchor);
        if depth == last {
            return format!(
                "(SELECT COUNT(*) FROM {} AS {} WHERE {})",
                relation.table.name, alias, condition
            );
        }
        anchor = format!(
            "IN (SELECT {}.id FROM {} AS {} WHERE {})",
            alias, relation.table.name, alias, condition
        );
    }
    "0".to_string()
}
