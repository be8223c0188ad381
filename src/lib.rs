//! tablesnap backs up every table of a database into one artifact per table and
//! restores those artifacts later by replaying them as literal INSERT statements.

pub mod backup;
pub mod cli;
pub mod errors;
pub mod restore;
pub mod sqlite;
pub mod utils;

pub use backup::{backup_tables, run_backup};
pub use errors::{Result, SnapError};
pub use restore::{override_table, restore_tables, run_restore};
pub use sqlite::SqliteDatabase;
