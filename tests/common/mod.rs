#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use once_cell::sync::Lazy;
use rusqlite::Connection;
use serde_json::{json, Value};
use tablesnap_config::Config;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const HR_SCHEMA: &str = "
    CREATE TABLE countries (country_id TEXT, country_name TEXT, region_id INTEGER);
    CREATE TABLE departments (department_id INTEGER, department_name TEXT, logo BLOB);
    CREATE TABLE regions (region_id INTEGER, region_name TEXT);
";

pub const EMPLOYEES_SCHEMA: &str = "
    CREATE TABLE employees (
        employee_id INTEGER, last_name TEXT, salary REAL, commission_pct REAL, hire_date DATE
    );
";

/// A fresh directory that outlives the calling test.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Creates a SQLite file from `schema` and returns its path.
pub fn sqlite_file(dir: &Path, name: &str, schema: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).expect("create sqlite file");
    conn.execute_batch(schema).expect("apply schema");
    path
}

/// A small HR database: three tables, departments holding a blob.
pub fn hr_database(dir: &Path) -> PathBuf {
    let path = sqlite_file(dir, "hr.db", HR_SCHEMA);
    let conn = Connection::open(&path).expect("open sqlite file");
    conn.execute_batch(
        "INSERT INTO countries VALUES ('IE', 'Ireland', 1), ('IT', 'Italy', 1), ('US', NULL, 2);
         INSERT INTO departments VALUES (10, 'Administration', x'89504e47');
         INSERT INTO regions VALUES (1, 'Europe'), (2, 'Americas');",
    )
    .expect("seed hr data");
    path
}

/// Employees with a `hire_date` column, the default date override target.
pub fn employees_database(dir: &Path) -> PathBuf {
    let path = sqlite_file(dir, "employees.db", EMPLOYEES_SCHEMA);
    let conn = Connection::open(&path).expect("open sqlite file");
    conn.execute_batch(
        "INSERT INTO employees VALUES (100, 'King', 24000.0, NULL, '1987-06-17');
         INSERT INTO employees VALUES (101, 'O''Brien', 17000.5, 0.25, '1989-09-21 08:30:00');",
    )
    .expect("seed employees");
    path
}

pub fn sqlite_url(path: &Path) -> String {
    format!("jdbc:sqlite:{}", path.display())
}

pub fn config_json(url: &str, output: &Path, src: &Path, extra: Value) -> Value {
    let mut value = json!({
        "jdbc.url": url,
        "jdbc.username": "hr",
        "jdbc.password": "hr",
        "output.dir": output,
        "src.dir": src,
    });
    if let (Some(base), Value::Object(extra)) = (value.as_object_mut(), extra) {
        base.extend(extra);
    }
    value
}

pub fn config(url: &str, output: &Path, src: &Path, extra: Value) -> Config {
    serde_json::from_value(config_json(url, output, src, extra)).expect("valid config")
}

/// Writes `config_<env>.json` into `dir`.
pub fn write_config(dir: &Path, environment: &str, value: &Value) -> PathBuf {
    let path = dir.join(format!("config_{environment}.json"));
    fs::write(&path, serde_json::to_string_pretty(value).expect("encode config"))
        .expect("write config");
    path
}

pub fn count_rows(path: &Path, table: &str) -> i64 {
    let conn = Connection::open(path).expect("open sqlite file");
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("count rows")
}
