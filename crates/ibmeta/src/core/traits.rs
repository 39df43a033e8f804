//! Seams to the execution collaborator.
//!
//! - [`Executor`]: the narrow statement-execution interface consumed from the
//!   engine binding (connection and transaction handling live there)
//! - [`FromRow`]: positional decoding of one catalog query's projection
//!
//! Every operation in this crate is synchronous: statements are issued in
//! program order and each call blocks until the engine answers. Atomicity of
//! multi-statement sequences is the caller's concern.

use crate::error::Result;

use super::value::{Row, SqlValue};

/// Execute SQL against one open database connection.
///
/// Implementations surface engine failures as
/// [`MetaError::Engine`](crate::MetaError::Engine); this crate propagates them
/// unchanged.
pub trait Executor {
    /// Execute a statement that yields no rows (DDL, catalog patches).
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Execute a statement and hand every result row to `handler`.
    ///
    /// Text values of fixed-length columns arrive trimmed of trailing padding.
    fn query(&mut self, sql: &str, handler: &mut dyn FnMut(&Row) -> Result<()>) -> Result<()>;

    /// Execute a parameterized statement, returning the affected row count.
    fn execute_for(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn execute(&mut self, sql: &str) -> Result<()> {
        (**self).execute(sql)
    }

    fn query(&mut self, sql: &str, handler: &mut dyn FnMut(&Row) -> Result<()>) -> Result<()> {
        (**self).query(sql, handler)
    }

    fn execute_for(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        (**self).execute_for(sql, params)
    }
}

/// Decode a fixed-shape projection from a result row.
pub trait FromRow: Sized {
    /// Build the projection from `row`, reading columns by position.
    fn from_row(row: &Row) -> Result<Self>;
}

/// Run `sql` and decode every row into `T`.
pub fn query_as<T: FromRow>(exec: &mut dyn Executor, sql: &str) -> Result<Vec<T>> {
    let mut decoded = Vec::new();
    exec.query(sql, &mut |row| {
        decoded.push(T::from_row(row)?);
        Ok(())
    })?;
    Ok(decoded)
}

/// Run `sql` and return the first column of the first row, if any.
pub fn query_scalar(exec: &mut dyn Executor, sql: &str) -> Result<Option<SqlValue>> {
    let mut first = None;
    exec.query(sql, &mut |row| {
        if first.is_none() {
            first = Some(row.get(0)?.clone());
        }
        Ok(())
    })?;
    Ok(first)
}
