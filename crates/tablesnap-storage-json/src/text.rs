//! The bracketed-map text layout: one `{COL1=val1, COL2=val2}` line per row.
//!
//! Decoding is lossy on purpose. Every value comes back as text (or null when a
//! field has no `=`), whatever type it had in the source table.

use tablesnap_domain::{ColumnValue, Record};

const FIELD_SEPARATOR: &str = ", ";

pub fn encode(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

/// Decodes every non-blank line into a record.
pub fn decode(data: &str) -> Vec<Record> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

pub fn parse_line(line: &str) -> Record {
    let line = line.trim();
    let body = line.strip_prefix('{').unwrap_or(line);
    let body = body.strip_suffix('}').unwrap_or(body);

    let mut record = Record::new();
    for field in body.split(FIELD_SEPARATOR).filter(|field| !field.is_empty()) {
        match field.split_once('=') {
            Some((column, value)) => record.set(column, ColumnValue::from(value)),
            None => record.set(field, ColumnValue::Null),
        }
    }
    record
}
