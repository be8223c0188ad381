use tablesnap_domain::ColumnValue;

use crate::CoreError;

/// Column names plus positional values, as returned by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ColumnValue>>,
}

/// The slice of a database connection the engine needs.
///
/// One connection is opened per run and used serially, so methods take `&mut self`
/// and implementations need no locking.
pub trait Database {
    /// Every table visible to the connection, in a stable order.
    fn list_tables(&mut self) -> Result<Vec<String>, CoreError>;
    /// Runs a query and returns each row's values aligned with the column names.
    fn query(&mut self, sql: &str) -> Result<RowSet, CoreError>;
    /// Runs a data-manipulation statement and returns the affected row count.
    fn execute(&mut self, sql: &str) -> Result<u64, CoreError>;
    /// Releases the connection. Later calls on a closed connection fail.
    fn close(&mut self) -> Result<(), CoreError>;
}
