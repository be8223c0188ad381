//! Per-table fault isolation and run summaries.

use std::fmt;

use crate::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum TableStatus {
    Success { rows: usize },
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableOutcome {
    pub table: String,
    pub status: TableStatus,
}

impl TableOutcome {
    pub fn success(table: impl Into<String>, rows: usize) -> Self {
        Self {
            table: table.into(),
            status: TableStatus::Success { rows },
        }
    }

    pub fn skipped(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            status: TableStatus::Skipped(reason.into()),
        }
    }

    pub fn failed(table: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            status: TableStatus::Failed(cause.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, TableStatus::Failed(_))
    }
}

impl fmt::Display for TableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            TableStatus::Success { rows } => write!(f, "{}: {} row(s)", self.table, rows),
            TableStatus::Skipped(reason) => write!(f, "{}: skipped ({})", self.table, reason),
            TableStatus::Failed(cause) => write!(f, "{}: failed ({})", self.table, cause),
        }
    }
}

/// Runs one table's work so that its error ends up in the outcome instead of
/// escaping to the caller's loop.
pub fn run_isolated<F>(table: &str, step: F) -> TableOutcome
where
    F: FnOnce() -> Result<TableStatus, CoreError>,
{
    match step() {
        Ok(status) => TableOutcome {
            table: table.to_string(),
            status,
        },
        Err(err) => TableOutcome::failed(table, err.to_string()),
    }
}

/// Outcomes of one backup or restore run, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    outcomes: Vec<TableOutcome>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: TableOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[TableOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, TableStatus::Success { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, TableStatus::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, TableStatus::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcome(&self, table: &str) -> Option<&TableOutcome> {
        self.outcomes.iter().find(|outcome| outcome.table == table)
    }

    fn count(&self, predicate: impl Fn(&TableStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded(),
            self.skipped(),
            self.failed()
        )
    }
}
