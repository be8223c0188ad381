//! DELETE / INSERT statement construction.
//!
//! Values are inlined as literals rather than bound as parameters. Everything that
//! knows this lives behind [`StatementBuilder`].

use tablesnap_domain::Record;

use crate::{
    literal::{render_literal, OverrideTable},
    CoreError,
};

/// Produces the statement text the restore pass executes.
pub trait StatementBuilder {
    /// Full-table deletion, no WHERE clause.
    fn delete_all(&self, table: &str) -> String;
    /// One INSERT for one record, columns in the record's order.
    fn insert(&self, table: &str, record: &Record) -> Result<String, CoreError>;
}

/// Builds complete statements with every value inlined as a literal.
#[derive(Debug, Clone, Default)]
pub struct LiteralStatementBuilder {
    overrides: OverrideTable,
}

impl LiteralStatementBuilder {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }
}

impl StatementBuilder for LiteralStatementBuilder {
    fn delete_all(&self, table: &str) -> String {
        format!("DELETE FROM {table}")
    }

    fn insert(&self, table: &str, record: &Record) -> Result<String, CoreError> {
        if record.is_empty() {
            return Err(CoreError::EmptyRecord(table.to_string()));
        }
        let mut columns = Vec::with_capacity(record.len());
        let mut literals = Vec::with_capacity(record.len());
        for (column, value) in record.iter() {
            let rule = self.overrides.lookup(table, column);
            columns.push(column);
            literals.push(render_literal(Some(value), rule));
        }
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            literals.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablesnap_domain::ColumnValue;

    fn employee() -> Record {
        let mut record = Record::new();
        record.set("EMPLOYEE_ID", 206_i64);
        record.set("LAST_NAME", "O'Connell");
        record.set("HIRE_DATE", "2002-06-07 00:00:00");
        record.set("SALARY", 8300.5);
        record.set("MANAGER_ID", ColumnValue::Null);
        record
    }

    #[test]
    fn delete_has_no_where_clause() {
        let builder = LiteralStatementBuilder::default();
        assert_eq!(builder.delete_all("EMPLOYEES"), "DELETE FROM EMPLOYEES");
    }

    #[test]
    fn insert_inlines_every_literal_in_record_order() {
        let builder = LiteralStatementBuilder::new(OverrideTable::standard());
        let sql = builder.insert("EMPLOYEES", &employee()).expect("build insert");
        assert_eq!(
            sql,
            "INSERT INTO EMPLOYEES (EMPLOYEE_ID, LAST_NAME, HIRE_DATE, SALARY, MANAGER_ID) \
             VALUES (206, 'O''Connell', TO_DATE('2002-06-07 00:00:00', 'YYYY-MM-DD HH24:MI:SS'), \
             8300.5, NULL)"
        );
    }

    #[test]
    fn without_overrides_dates_are_plain_strings() {
        let builder = LiteralStatementBuilder::new(OverrideTable::empty());
        let sql = builder.insert("EMPLOYEES", &employee()).expect("build insert");
        assert!(sql.contains("'2002-06-07 00:00:00'"));
        assert!(!sql.contains("TO_DATE"));
    }

    #[test]
    fn empty_record_is_rejected() {
        let builder = LiteralStatementBuilder::default();
        assert!(matches!(
            builder.insert("EMPLOYEES", &Record::new()),
            Err(CoreError::EmptyRecord(table)) if table == "EMPLOYEES"
        ));
    }
}
