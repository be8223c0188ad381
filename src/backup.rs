//! Full-database backup: every table captured into one artifact each.

use tablesnap_config::Config;
use tablesnap_core::{capture_table, run_isolated, Database, RunSummary, TableStatus};
use tablesnap_storage_json::ArtifactStore;
use tracing::{error, info, warn};

use crate::{
    errors::{Result, SnapError},
    sqlite::SqliteDatabase,
};

/// Connects with the environment's settings and backs up every table.
pub fn run_backup(config: &Config, environment: &str) -> Result<RunSummary> {
    let output_dir = config.output_dir()?;
    let url = config.jdbc_url()?;
    info!("Starting backup for environment: {}", environment);

    let mut db = SqliteDatabase::connect(url, config.username(), config.password())
        .map_err(SnapError::Connect)?;
    info!("Connected to database: {}", url);

    let store = ArtifactStore::new(output_dir, config.artifact_format);
    let result = store
        .ensure_dir()
        .map_err(|source| SnapError::OutputDir {
            dir: output_dir.to_path_buf(),
            source,
        })
        .and_then(|()| backup_tables(&mut db, &store));

    if let Err(err) = db.close() {
        warn!("Error closing database connection: {}", err);
    }
    result
}

/// Captures each listed table into `store`.
///
/// Only a failure to list tables aborts; a table that cannot be read or written is
/// recorded as failed and the run moves on.
pub fn backup_tables(db: &mut dyn Database, store: &ArtifactStore) -> Result<RunSummary> {
    let tables = db.list_tables().map_err(SnapError::ListTables)?;
    info!("Found {} table(s) to back up", tables.len());

    let mut summary = RunSummary::new();
    for table in &tables {
        info!("Starting backup for table: {}", table);
        let outcome = run_isolated(table, || {
            let records = capture_table(&mut *db, table)?;
            let path = store.write_table(table, &records)?;
            info!(
                "Backup completed for table: {} ({} rows -> {})",
                table,
                records.len(),
                path.display()
            );
            Ok(TableStatus::Success {
                rows: records.len(),
            })
        });
        if let TableStatus::Failed(cause) = &outcome.status {
            error!("Error backing up table {}: {}", table, cause);
        }
        summary.record(outcome);
    }

    info!("Backup finished: {}", summary);
    Ok(summary)
}
