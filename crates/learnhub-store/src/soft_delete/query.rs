use std::marker::PhantomData;
use std::time::Instant;

use chrono::{DateTime, Utc};
use learnhub_core::model::lifecycle::{now, to_millis};
use learnhub_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use super::{Scope, SoftDeletable};
use crate::errors::{from_rusqlite, invalid_query, Result};

#[derive(Clone)]
struct Filter {
    sql: String,
    params: Vec<Value>,
}

/// A selection of rows of `T` within a [`Scope`]
///
/// Built with the `filter_*` methods and consumed by the terminal reads
/// (`fetch`, `first`, `get`, `count`, `exists`, `ids`) or the bulk
/// operations. Column names are interpolated into SQL and must be constants;
/// values are always bound as parameters.
pub struct Query<'c, T> {
    conn: &'c Connection,
    scope: Scope,
    filters: Vec<Filter>,
    order: Option<&'static str>,
    limit: Option<u64>,
    offset: Option<u64>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            scope: self.scope,
            filters: self.filters.clone(),
            order: self.order,
            limit: self.limit,
            offset: self.offset,
            _record: PhantomData,
        }
    }
}

impl<'c, T: SoftDeletable> Query<'c, T> {
    pub(crate) fn new(conn: &'c Connection, scope: Scope) -> Self {
        Self {
            conn,
            scope,
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
            _record: PhantomData,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub(crate) fn conn(&self) -> &'c Connection {
        self.conn
    }

    // ===== Builders =====

    /// `column = value`
    pub fn filter_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            sql: format!("{} = ?", column),
            params: vec![value.into()],
        });
        self
    }

    /// `id IN (...)`; an empty id list selects nothing
    pub fn filter_ids(self, ids: &[i64]) -> Self {
        self.filter_in("id", ids.iter().copied())
    }

    /// `column IN (...)`; an empty value list selects nothing
    pub fn filter_in<V: Into<Value>>(
        mut self,
        column: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let params: Vec<Value> = values.into_iter().map(Into::into).collect();
        let sql = if params.is_empty() {
            "0 = 1".to_string()
        } else {
            let placeholders = vec!["?"; params.len()].join(", ");
            format!("{} IN ({})", column, placeholders)
        };
        self.filters.push(Filter { sql, params });
        self
    }

    /// Arbitrary predicate with positional `?` parameters
    pub fn filter_raw(mut self, sql: impl Into<String>, params: Vec<Value>) -> Self {
        self.filters.push(Filter {
            sql: sql.into(),
            params,
        });
        self
    }

    /// Replace the table's default ordering
    pub fn order_by(mut self, order: &'static str) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    // ===== SQL assembly =====

    /// WHERE clause (without the keyword) and its parameters
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut parts: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(predicate) = self.scope.predicate() {
            parts.push(predicate.to_string());
        }
        for filter in &self.filters {
            parts.push(format!("({})", filter.sql));
            params.extend(filter.params.iter().cloned());
        }

        if parts.is_empty() {
            ("1 = 1".to_string(), params)
        } else {
            (parts.join(" AND "), params)
        }
    }

    /// ORDER BY plus LIMIT/OFFSET
    pub(crate) fn order_and_slice(&self) -> String {
        let mut tail = format!(" ORDER BY {}", self.order.unwrap_or(T::table().default_order));
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => tail.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => tail.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => tail.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }
        tail
    }

    pub(crate) fn ensure_unsliced(&self, op: &str) -> Result<()> {
        if self.limit.is_some() || self.offset.is_some() {
            return Err(invalid_query(
                op,
                T::table().label,
                "bulk operations cannot run on a sliced query",
            ));
        }
        Ok(())
    }

    // ===== Reads =====

    pub fn fetch(&self) -> Result<Vec<T>> {
        let table = T::table();
        let (where_sql, params) = self.where_clause();
        let sql = format!(
            "SELECT {} FROM {} WHERE {}{}",
            table.select_list(),
            table.name,
            where_sql,
            self.order_and_slice()
        );

        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let records = stmt
            .query_map(params_from_iter(params.iter()), T::from_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<T>>>()
            .map_err(from_rusqlite)?;
        Ok(records)
    }

    pub fn first(&self) -> Result<Option<T>> {
        let mut single = self.clone();
        single.limit = Some(1);
        Ok(single.fetch()?.into_iter().next())
    }

    /// The row with this id, if it is within the query
    pub fn get(&self, id: i64) -> Result<Option<T>> {
        self.clone().filter_ids(&[id]).first()
    }

    pub fn count(&self) -> Result<u64> {
        let (where_sql, params) = self.where_clause();
        let sql = format!(
            "SELECT COUNT(*) FROM (SELECT id FROM {} WHERE {}{})",
            T::table().name,
            where_sql,
            self.order_and_slice()
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(from_rusqlite)?;
        Ok(count.max(0) as u64)
    }

    pub fn exists(&self) -> Result<bool> {
        let (where_sql, params) = self.where_clause();
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {}{})",
            T::table().name,
            where_sql,
            self.order_and_slice()
        );
        self.conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(from_rusqlite)
    }

    pub fn ids(&self) -> Result<Vec<i64>> {
        let (where_sql, params) = self.where_clause();
        let sql = format!(
            "SELECT id FROM {} WHERE {}{}",
            T::table().name,
            where_sql,
            self.order_and_slice()
        );
        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let ids = stmt
            .query_map(params_from_iter(params.iter()), |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .map_err(from_rusqlite)?;
        Ok(ids)
    }

    // ===== Bulk operations =====

    /// Soft-delete every matched row in one statement
    ///
    /// Returns the number of rows matched. A row that is already deleted keeps
    /// its original `deleted_at`. `updated_at` is not touched.
    pub fn soft_delete(&self) -> Result<usize> {
        self.soft_delete_at(now())
    }

    /// [`Query::soft_delete`] with an explicit deletion time
    pub fn soft_delete_at(&self, at: DateTime<Utc>) -> Result<usize> {
        let (where_sql, mut params) = self.where_clause();
        params.insert(0, Value::Integer(to_millis(at)));
        let sql = format!(
            "UPDATE {} SET is_deleted = 1, deleted_at = COALESCE(deleted_at, ?) WHERE {}",
            T::table().name,
            where_sql
        );
        self.bulk_update("soft_delete", sql, params)
    }

    /// Clear the deletion flag and timestamp of every matched row
    pub fn restore(&self) -> Result<usize> {
        let (where_sql, params) = self.where_clause();
        let sql = format!(
            "UPDATE {} SET is_deleted = 0, deleted_at = NULL WHERE {}",
            T::table().name,
            where_sql
        );
        self.bulk_update("restore", sql, params)
    }

    /// Soft delete. Rows stay in the table and remain visible through
    /// `all_query` and `deleted_query`; use `purge::HardDelete` to remove
    /// them for good.
    pub fn delete(&self) -> Result<usize> {
        self.soft_delete()
    }

    fn bulk_update(&self, op: &'static str, sql: String, params: Vec<Value>) -> Result<usize> {
        let table = T::table();
        self.ensure_unsliced(op)?;

        let started = Instant::now();
        log_op_start!(op, table = table.name, scope = self.scope.as_str());

        let result = self
            .conn
            .execute(&sql, params_from_iter(params.iter()))
            .map_err(|e| from_rusqlite(e).with_op(op).with_entity_kind(table.label));

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(affected) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    table = table.name,
                    scope = self.scope.as_str(),
                    affected = *affected
                );
            }
            Err(e) => {
                log_op_error!(op, e.clone(), duration_ms = duration_ms, table = table.name);
            }
        }
        result
    }
}
