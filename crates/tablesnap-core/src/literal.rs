//! Rendering of column values as SQL literals.
//!
//! Artifacts carry no type tags, so the literal chosen for a value depends on the
//! value's shape and on a column-name keyed override table, never on a catalog.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tablesnap_domain::ColumnValue;

/// Oracle-style pattern matching [`tablesnap_domain::TEMPORAL_FORMAT`].
pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD HH24:MI:SS";
pub const DEFAULT_DATE_FUNCTION: &str = "TO_DATE";
pub const DEFAULT_DATE_COLUMN: &str = "HIRE_DATE";

pub const NULL_LITERAL: &str = "NULL";

static DEFAULT_OVERRIDES: Lazy<OverrideTable> = Lazy::new(|| {
    OverrideTable::empty().with_column(
        DEFAULT_DATE_COLUMN,
        OverrideRule::new(DEFAULT_DATE_FUNCTION, DEFAULT_DATE_PATTERN),
    )
});

/// Wraps a value's raw text in a conversion call, e.g. `TO_DATE('<raw>', '<pattern>')`.
///
/// The raw text is not reformatted or validated; a text that does not match the
/// pattern is left for the database to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    pub function: String,
    pub pattern: String,
}

impl OverrideRule {
    pub fn new(function: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            pattern: pattern.into(),
        }
    }

    pub fn to_date(pattern: impl Into<String>) -> Self {
        Self::new(DEFAULT_DATE_FUNCTION, pattern)
    }

    pub fn render(&self, raw: &str) -> String {
        format!(
            "{}({}, {})",
            self.function,
            quote_text(raw),
            quote_text(&self.pattern)
        )
    }
}

/// Column-name keyed literal overrides.
///
/// Lookups ignore ASCII case. Per-table entries win over global ones; without them a
/// column name shared by two tables with different types gets the same rule in both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    columns: HashMap<String, OverrideRule>,
    tables: HashMap<String, HashMap<String, OverrideRule>>,
}

impl OverrideTable {
    /// A table with no rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rules: `HIRE_DATE` rendered through `TO_DATE`.
    pub fn standard() -> Self {
        DEFAULT_OVERRIDES.clone()
    }

    pub fn with_column(mut self, column: &str, rule: OverrideRule) -> Self {
        self.insert_column(column, rule);
        self
    }

    pub fn with_table_column(mut self, table: &str, column: &str, rule: OverrideRule) -> Self {
        self.insert_table_column(table, column, rule);
        self
    }

    pub fn insert_column(&mut self, column: &str, rule: OverrideRule) {
        self.columns.insert(normalize(column), rule);
    }

    pub fn insert_table_column(&mut self, table: &str, column: &str, rule: OverrideRule) {
        self.tables
            .entry(normalize(table))
            .or_default()
            .insert(normalize(column), rule);
    }

    pub fn lookup(&self, table: &str, column: &str) -> Option<&OverrideRule> {
        let column = normalize(column);
        self.tables
            .get(&normalize(table))
            .and_then(|rules| rules.get(&column))
            .or_else(|| self.columns.get(&column))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.tables.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Single-quotes text, doubling every embedded quote.
pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Renders one value as the literal for its column.
///
/// `None` means the record had no entry for the column.
pub fn render_literal(value: Option<&ColumnValue>, rule: Option<&OverrideRule>) -> String {
    let value = match value {
        Some(value) if !value.is_null() => value,
        _ => return NULL_LITERAL.to_string(),
    };
    if let Some(rule) = rule {
        return rule.render(&value.to_string());
    }
    match value {
        ColumnValue::Text(text) => quote_text(text),
        ColumnValue::Temporal(_) => quote_text(&value.to_string()),
        ColumnValue::Integer(_) | ColumnValue::Float(_) | ColumnValue::Boolean(_) => {
            value.to_string()
        }
        ColumnValue::Null => NULL_LITERAL.to_string(),
    }
}
