//! RAII-based transaction support.

use crate::error::Result;
use rusqlite::{Connection, Params};

/// Groups several store operations into one atomic unit.
///
/// Obtained from [`Library::transaction`](crate::Library::transaction), or
/// internally when a migration step runs. Writes become permanent only on
/// [`commit`](Transaction::commit); dropping the transaction first discards
/// them.
pub struct Transaction<'a> {
    conn: &'a Connection,
    open: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(conn: &'a Connection) -> Result<Self> {
        conn.execute_batch("BEGIN")?;
        Ok(Self { conn, open: true })
    }

    /// Executes one parameterized SQL statement within the transaction,
    /// returning the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`](crate::Error::Database) when the
    /// statement fails.
    pub fn execute(&self, sql: &str, params: impl Params) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Executes a batch of semicolon-separated statements, used by
    /// migration steps whose DDL spans several statements.
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        Ok(self.conn.execute_batch(sql)?)
    }

    /// Makes the grouped writes permanent.
    pub fn commit(mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        self.open = false;
        Ok(())
    }

    /// Discards the grouped writes without waiting for drop.
    pub fn rollback(mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        self.open = false;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.open {
            // Errors cannot be surfaced from drop
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
