//! Turns query results into records.

use tablesnap_domain::{ColumnValue, Record};

use crate::{CoreError, Database};

/// Builds the full-table query used for capture.
pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {table}")
}

/// Pairs each row's values with the column names, unchanged.
///
/// This is the last point where the driver's own types are known, so no value is
/// converted here.
pub fn serialize_rows<I>(
    table: &str,
    columns: &[String],
    rows: I,
) -> Result<Vec<Record>, CoreError>
where
    I: IntoIterator<Item = Vec<ColumnValue>>,
{
    let mut records = Vec::new();
    for (index, values) in rows.into_iter().enumerate() {
        if values.len() != columns.len() {
            return Err(CoreError::RowShape {
                table: table.to_string(),
                row: index + 1,
                expected: columns.len(),
                actual: values.len(),
            });
        }
        let mut record = Record::with_capacity(columns.len());
        for (column, value) in columns.iter().zip(values) {
            record.set(column.as_str(), value);
        }
        records.push(record);
    }
    Ok(records)
}

/// Reads every row of `table` through the connection.
pub fn capture_table(db: &mut dyn Database, table: &str) -> Result<Vec<Record>, CoreError> {
    let rows = db.query(&select_all(table))?;
    serialize_rows(table, &rows.columns, rows.rows)
}
