use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Row {row} of `{table}` has {actual} values for {expected} columns")]
    RowShape {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Unsupported value in column `{column}`: {kind}")]
    UnsupportedValue { column: String, kind: String },
    #[error("Cannot build an INSERT for `{0}` from a record with no columns")]
    EmptyRecord(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
