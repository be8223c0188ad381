//! Restore: each artifact replaces the full contents of its table.
//!
//! A table is emptied and refilled with one statement per row, without a transaction.
//! If an insert fails halfway the table keeps only the rows inserted before it.

use std::path::Path;

use tablesnap_config::{Config, OverrideSpec};
use tablesnap_core::{
    run_isolated, Database, LiteralStatementBuilder, OverrideRule, OverrideTable, RunSummary,
    StatementBuilder, TableStatus,
};
use tablesnap_storage_json::{ArtifactEntry, ArtifactStore};
use tracing::{debug, error, info, warn};

use crate::{
    errors::{Result, SnapError},
    sqlite::SqliteDatabase,
};

/// Connects with the environment's settings and restores every artifact in `src.dir`.
pub fn run_restore(config: &Config, environment: &str) -> Result<RunSummary> {
    let src_dir = config.src_dir()?;
    let url = config.jdbc_url()?;
    info!("Starting restore for environment: {}", environment);

    let mut db = SqliteDatabase::connect(url, config.username(), config.password())
        .map_err(SnapError::Connect)?;
    info!("Connected to database: {}", url);

    let store = ArtifactStore::new(src_dir, config.artifact_format);
    let builder = LiteralStatementBuilder::new(override_table(config));
    let result = restore_tables(&mut db, &store, &builder);

    if let Err(err) = db.close() {
        warn!("Error closing database connection: {}", err);
    }
    result
}

/// Literal overrides from the config; the built-in `HIRE_DATE` rule when none are set.
pub fn override_table(config: &Config) -> OverrideTable {
    let mut table = match &config.column_overrides {
        None => OverrideTable::standard(),
        Some(columns) => {
            let mut table = OverrideTable::empty();
            for (column, spec) in columns {
                table.insert_column(column, rule(spec));
            }
            table
        }
    };
    for (name, columns) in &config.table_overrides {
        for (column, spec) in columns {
            table.insert_table_column(name, column, rule(spec));
        }
    }
    table
}

fn rule(spec: &OverrideSpec) -> OverrideRule {
    OverrideRule::new(spec.function.clone(), spec.pattern.clone())
}

/// Restores every artifact found in `store`, one table at a time.
pub fn restore_tables(
    db: &mut dyn Database,
    store: &ArtifactStore,
    builder: &dyn StatementBuilder,
) -> Result<RunSummary> {
    if store.validate_source().is_err() {
        return Err(SnapError::SourceDir(store.dir().to_path_buf()));
    }
    let entries = store
        .list_artifacts()
        .map_err(|source| SnapError::ListArtifacts {
            dir: store.dir().to_path_buf(),
            source,
        })?;

    let mut summary = RunSummary::new();
    if entries.is_empty() {
        info!(
            "No {} artifacts found in {}",
            store.format(),
            store.dir().display()
        );
        return Ok(summary);
    }

    for entry in &entries {
        info!("Starting restore for table: {}", entry.table);
        let outcome = run_isolated(&entry.table, || {
            restore_table(&mut *db, store, builder, entry)
        });
        match &outcome.status {
            TableStatus::Success { rows } => {
                info!("Restore completed for table: {} ({} rows)", entry.table, rows)
            }
            TableStatus::Skipped(reason) => {
                info!("Skipping table {}: {}", entry.table, reason)
            }
            TableStatus::Failed(cause) => {
                error!("Error restoring table {}: {}", entry.table, cause)
            }
        }
        summary.record(outcome);
    }

    info!("Restore finished: {}", summary);
    Ok(summary)
}

fn restore_table(
    db: &mut dyn Database,
    store: &ArtifactStore,
    builder: &dyn StatementBuilder,
    entry: &ArtifactEntry,
) -> std::result::Result<TableStatus, tablesnap_core::CoreError> {
    let records = match store.read_artifact(&entry.path) {
        Ok(records) => records,
        Err(err) => {
            warn!("Error reading {}: {}", entry.path.display(), err);
            return Ok(TableStatus::Skipped(format!(
                "{} is unreadable",
                file_name(&entry.path)
            )));
        }
    };
    if records.is_empty() {
        return Ok(TableStatus::Skipped(format!(
            "{} has no rows",
            file_name(&entry.path)
        )));
    }

    // Render everything first so a bad record never leaves the table emptied.
    let inserts = records
        .iter()
        .map(|record| builder.insert(&entry.table, record))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let deleted = db.execute(&builder.delete_all(&entry.table))?;
    debug!("Deleted {} existing row(s) from {}", deleted, entry.table);
    for insert in &inserts {
        debug!("Executing: {}", insert);
        db.execute(insert)?;
    }
    Ok(TableStatus::Success {
        rows: inserts.len(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn absent_overrides_fall_back_to_hire_date() {
        let table = override_table(&Config::default());
        assert!(table.lookup("EMPLOYEES", "HIRE_DATE").is_some());
    }

    #[test]
    fn configured_overrides_replace_the_builtin_rule() {
        let mut columns = BTreeMap::new();
        columns.insert(
            "start_date".to_string(),
            OverrideSpec {
                function: "TO_TIMESTAMP".into(),
                pattern: "YYYY-MM-DD".into(),
            },
        );
        let config = Config {
            column_overrides: Some(columns),
            ..Config::default()
        };
        let table = override_table(&config);
        assert!(table.lookup("EMPLOYEES", "HIRE_DATE").is_none());
        assert_eq!(
            table
                .lookup("JOB_HISTORY", "START_DATE")
                .map(|rule| rule.function.as_str()),
            Some("TO_TIMESTAMP")
        );
    }

    #[test]
    fn empty_override_object_disables_rules() {
        let config = Config {
            column_overrides: Some(BTreeMap::new()),
            ..Config::default()
        };
        assert!(override_table(&config).is_empty());
    }
}
