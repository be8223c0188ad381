mod common;

use std::fs;

use rusqlite::Connection;
use serde_json::json;
use tablesnap::{restore_tables, run_backup, run_restore, SnapError, SqliteDatabase};
use tablesnap_core::{
    CoreError, Database, LiteralStatementBuilder, OverrideTable, RowSet, TableStatus,
};
use tablesnap_domain::ArtifactFormat;
use tablesnap_storage_json::ArtifactStore;

use common::{
    config, count_rows, employees_database, hr_database, scratch_dir, sqlite_file, sqlite_url,
    EMPLOYEES_SCHEMA, HR_SCHEMA,
};

/// Records every statement; fails any statement containing `fail_on`.
#[derive(Default)]
struct RecordingDatabase {
    statements: Vec<String>,
    fail_on: Option<&'static str>,
}

impl Database for RecordingDatabase {
    fn list_tables(&mut self) -> Result<Vec<String>, CoreError> {
        Ok(Vec::new())
    }

    fn query(&mut self, _sql: &str) -> Result<RowSet, CoreError> {
        Ok(RowSet::default())
    }

    fn execute(&mut self, sql: &str) -> Result<u64, CoreError> {
        self.statements.push(sql.to_string());
        match self.fail_on {
            Some(marker) if sql.contains(marker) => {
                Err(CoreError::Database(format!("rejected: {marker}")))
            }
            _ => Ok(1),
        }
    }

    fn close(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}

fn standard_builder() -> LiteralStatementBuilder {
    LiteralStatementBuilder::new(OverrideTable::standard())
}

#[test]
fn delete_precedes_inserts_with_inlined_literals() {
    let dir = scratch_dir();
    fs::write(
        dir.join("employees.json"),
        r#"[{"EMPLOYEE_ID":100,"LAST_NAME":"O'Connell","HIRE_DATE":"2007-06-21 00:00:00","COMMISSION_PCT":null}]"#,
    )
    .unwrap();

    let mut db = RecordingDatabase::default();
    let store = ArtifactStore::new(&dir, ArtifactFormat::Json);
    let summary = restore_tables(&mut db, &store, &standard_builder()).unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(
        db.statements,
        vec![
            "DELETE FROM EMPLOYEES".to_string(),
            "INSERT INTO EMPLOYEES (EMPLOYEE_ID, LAST_NAME, HIRE_DATE, COMMISSION_PCT) \
             VALUES (100, 'O''Connell', TO_DATE('2007-06-21 00:00:00', 'YYYY-MM-DD HH24:MI:SS'), NULL)"
                .to_string(),
        ]
    );
}

#[test]
fn empty_artifact_issues_no_statements() {
    let dir = scratch_dir();
    fs::write(dir.join("JOBS.json"), "[]").unwrap();
    fs::write(dir.join("REGIONS.json"), r#"[{"REGION_ID":1}]"#).unwrap();

    let mut db = RecordingDatabase::default();
    let store = ArtifactStore::new(&dir, ArtifactFormat::Json);
    let summary = restore_tables(&mut db, &store, &standard_builder()).unwrap();

    assert!(matches!(
        summary.outcome("JOBS").map(|outcome| &outcome.status),
        Some(TableStatus::Skipped(_))
    ));
    assert!(db.statements.iter().all(|sql| !sql.contains("JOBS")));
    assert_eq!(db.statements.len(), 2);
}

#[test]
fn malformed_artifact_is_skipped_without_statements() {
    let dir = scratch_dir();
    fs::write(dir.join("COUNTRIES.json"), "[{\"COUNTRY_ID\": ").unwrap();
    fs::write(dir.join("REGIONS.json"), r#"[{"REGION_ID":1}]"#).unwrap();

    let mut db = RecordingDatabase::default();
    let store = ArtifactStore::new(&dir, ArtifactFormat::Json);
    let summary = restore_tables(&mut db, &store, &standard_builder()).unwrap();

    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(db.statements[0], "DELETE FROM REGIONS");
}

#[test]
fn failed_insert_leaves_the_table_emptied_and_moves_on() {
    let dir = scratch_dir();
    fs::write(
        dir.join("COUNTRIES.json"),
        r#"[{"COUNTRY_ID":"IE"},{"COUNTRY_ID":"XX"},{"COUNTRY_ID":"US"}]"#,
    )
    .unwrap();
    fs::write(dir.join("REGIONS.json"), r#"[{"REGION_ID":1}]"#).unwrap();

    let mut db = RecordingDatabase {
        fail_on: Some("'XX'"),
        ..RecordingDatabase::default()
    };
    let store = ArtifactStore::new(&dir, ArtifactFormat::Json);
    let summary = restore_tables(&mut db, &store, &standard_builder()).unwrap();

    assert!(summary.outcome("COUNTRIES").unwrap().is_failure());
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(
        db.statements,
        vec![
            "DELETE FROM COUNTRIES",
            "INSERT INTO COUNTRIES (COUNTRY_ID) VALUES ('IE')",
            "INSERT INTO COUNTRIES (COUNTRY_ID) VALUES ('XX')",
            "DELETE FROM REGIONS",
            "INSERT INTO REGIONS (REGION_ID) VALUES (1)",
        ]
    );
}

#[test]
fn text_artifacts_restore_every_value_as_text() {
    let dir = scratch_dir();
    fs::write(
        dir.join("REGIONS.txt"),
        "{REGION_ID=1, REGION_NAME=Europe}\n{REGION_ID=2, REGION_NAME=null}\n",
    )
    .unwrap();
    fs::write(dir.join("IGNORED.json"), "[]").unwrap();

    let mut db = RecordingDatabase::default();
    let store = ArtifactStore::new(&dir, ArtifactFormat::Text);
    let summary = restore_tables(&mut db, &store, &standard_builder()).unwrap();

    assert_eq!(summary.outcomes().len(), 1);
    assert_eq!(
        db.statements[1..],
        [
            "INSERT INTO REGIONS (REGION_ID, REGION_NAME) VALUES ('1', 'Europe')",
            "INSERT INTO REGIONS (REGION_ID, REGION_NAME) VALUES ('2', NULL)",
        ]
    );
}

#[test]
fn missing_source_directory_is_fatal() {
    let dir = scratch_dir().join("nope");
    let mut db = RecordingDatabase::default();
    let store = ArtifactStore::new(&dir, ArtifactFormat::Json);
    let err = restore_tables(&mut db, &store, &standard_builder()).unwrap_err();
    assert!(matches!(err, SnapError::SourceDir(ref path) if *path == dir));
    assert!(db.statements.is_empty());
}

#[test]
fn no_artifacts_means_nothing_to_do() {
    let dir = scratch_dir();
    let mut db = RecordingDatabase::default();
    let store = ArtifactStore::new(&dir, ArtifactFormat::Json);
    let summary = restore_tables(&mut db, &store, &standard_builder()).unwrap();
    assert!(summary.is_empty());
    assert!(db.statements.is_empty());
}

#[test]
fn sqlite_backup_then_restore_replaces_table_contents() {
    let base = scratch_dir();
    let source = hr_database(&base);
    let artifacts = base.join("artifacts");
    run_backup(&config(&sqlite_url(&source), &artifacts, &base, json!({})), "test").unwrap();

    let target = sqlite_file(&base, "target.db", HR_SCHEMA);
    Connection::open(&target)
        .unwrap()
        .execute_batch(
            "INSERT INTO regions VALUES (9, 'Stale');
             INSERT INTO departments VALUES (1, 'Kept', NULL);",
        )
        .unwrap();

    let summary = run_restore(
        &config(&sqlite_url(&target), &base, &artifacts, json!({})),
        "test",
    )
    .unwrap();

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(count_rows(&target, "regions"), 2);
    assert_eq!(count_rows(&target, "countries"), 3);
    assert_eq!(count_rows(&target, "departments"), 1);

    let conn = Connection::open(&target).unwrap();
    let missing_name: Option<String> = conn
        .query_row(
            "SELECT country_name FROM countries WHERE country_id = 'US'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(missing_name, None);
    let region_id: i64 = conn
        .query_row(
            "SELECT region_id FROM countries WHERE country_id = 'IT'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(region_id, 1);
}

fn employee_rows(path: &std::path::Path) -> RowSet {
    let mut db = SqliteDatabase::connect(&sqlite_url(path), None, None).unwrap();
    db.query("SELECT * FROM employees ORDER BY employee_id").unwrap()
}

fn employees_round_trip(format: serde_json::Value) {
    let base = scratch_dir();
    let source = employees_database(&base);
    let artifacts = base.join("artifacts");
    let backup = run_backup(
        &config(&sqlite_url(&source), &artifacts, &base, format.clone()),
        "test",
    )
    .unwrap();
    assert_eq!(backup.succeeded(), 1);

    let target = sqlite_file(&base, "target.db", EMPLOYEES_SCHEMA);
    Connection::open(&target)
        .unwrap()
        .execute("INSERT INTO employees VALUES (1, 'Stale', 1.0, NULL, '2000-01-01')", [])
        .unwrap();

    let restore = run_restore(
        &config(&sqlite_url(&target), &base, &artifacts, format),
        "test",
    )
    .unwrap();
    assert_eq!(restore.succeeded(), 1, "{restore}");

    assert_eq!(employee_rows(&target), employee_rows(&source));
}

#[test]
fn sqlite_json_round_trip_restores_hire_date_through_to_date() {
    employees_round_trip(json!({}));
}

#[test]
fn sqlite_text_round_trip_restores_quoted_numbers_and_nulls() {
    employees_round_trip(json!({ "artifact.format": "text" }));
}

#[test]
fn restored_hire_date_keeps_its_calendar_value() {
    let base = scratch_dir();
    let source = employees_database(&base);
    let artifacts = base.join("artifacts");
    run_backup(&config(&sqlite_url(&source), &artifacts, &base, json!({})), "test").unwrap();
    let target = sqlite_file(&base, "target.db", EMPLOYEES_SCHEMA);
    run_restore(&config(&sqlite_url(&target), &base, &artifacts, json!({})), "test").unwrap();

    let conn = Connection::open(&target).unwrap();
    let (hired, commission): (String, Option<f64>) = conn
        .query_row(
            "SELECT hire_date, commission_pct FROM employees WHERE employee_id = 100",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(hired, "1987-06-17 00:00:00");
    assert_eq!(commission, None);
}
