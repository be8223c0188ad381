//! tablesnap-core
//!
//! Capture and replay logic for tablesnap.
//! Depends on tablesnap-domain. No CLI, no terminal I/O, no concrete database driver.

pub mod database;
pub mod error;
pub mod literal;
pub mod outcome;
pub mod serializer;
pub mod statement;

pub use database::{Database, RowSet};
pub use error::CoreError;
pub use literal::{OverrideRule, OverrideTable};
pub use outcome::{run_isolated, RunSummary, TableOutcome, TableStatus};
pub use serializer::{capture_table, serialize_rows};
pub use statement::{LiteralStatementBuilder, StatementBuilder};
