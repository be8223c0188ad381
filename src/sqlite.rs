//! SQLite implementation of the engine's database collaborator.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{functions::FunctionFlags, types::ValueRef, Connection, OpenFlags};
use tablesnap_core::{CoreError, Database, RowSet};
use tablesnap_domain::{ColumnValue, TEMPORAL_FORMAT};
use tracing::debug;

const URL_PREFIXES: [&str; 2] = ["jdbc:sqlite:", "sqlite:"];
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TO_DATE_FUNCTION: &str = "TO_DATE";
// Longest tokens first so `HH24` wins over `HH` and `MON` over `MM`.
const DATE_PATTERN_TOKENS: [(&str, &str); 12] = [
    ("YYYY", "%Y"),
    ("HH24", "%H"),
    ("HH12", "%I"),
    ("MON", "%b"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%I"),
    ("MI", "%M"),
    ("SS", "%S"),
    ("AM", "%p"),
    ("PM", "%p"),
];

/// A single SQLite connection, used serially for a whole run.
pub struct SqliteDatabase {
    conn: Option<Connection>,
}

impl SqliteDatabase {
    /// Opens an existing database file.
    ///
    /// `url` may be `jdbc:sqlite:<path>`, `sqlite:<path>` or a bare path. SQLite has no
    /// accounts, so credentials are accepted and ignored.
    pub fn connect(
        url: &str,
        username: Option<&str>,
        _password: Option<&str>,
    ) -> Result<Self, CoreError> {
        let path = database_path(url)?;
        if let Some(user) = username {
            debug!("ignoring username `{}` for sqlite database {}", user, path);
        }
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(db_error)?;
        Self::from_connection(conn)
    }

    /// Wraps an open connection and registers `TO_DATE(text, pattern)` on it, so the
    /// date literals rendered for restore run unchanged.
    pub fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        register_to_date(&conn).map_err(db_error)?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&self) -> Result<&Connection, CoreError> {
        self.conn
            .as_ref()
            .ok_or_else(|| CoreError::Database("connection is closed".into()))
    }
}

impl Database for SqliteDatabase {
    fn list_tables(&mut self) -> Result<Vec<String>, CoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(LIST_TABLES_SQL).map_err(db_error)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        Ok(names)
    }

    fn query(&mut self, sql: &str) -> Result<RowSet, CoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(db_error)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let temporal: Vec<bool> = stmt
            .columns()
            .iter()
            .map(|column| column.decl_type().map(is_temporal_decl).unwrap_or(false))
            .collect();

        let mut rows = stmt.query([]).map_err(db_error)?;
        let mut values = Vec::new();
        while let Some(row) = rows.next().map_err(db_error)? {
            let mut cells = Vec::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                let raw = row.get_ref(index).map_err(db_error)?;
                cells.push(native_value(column, raw, temporal[index])?);
            }
            values.push(cells);
        }
        Ok(RowSet {
            columns,
            rows: values,
        })
    }

    fn execute(&mut self, sql: &str) -> Result<u64, CoreError> {
        let affected = self.conn()?.execute(sql, []).map_err(db_error)?;
        Ok(affected as u64)
    }

    fn close(&mut self) -> Result<(), CoreError> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, err)| db_error(err)),
            None => Ok(()),
        }
    }
}

fn database_path(url: &str) -> Result<&str, CoreError> {
    let url = url.trim();
    let path = URL_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url);
    if path.starts_with("jdbc:") {
        return Err(CoreError::Database(format!(
            "unsupported database url `{url}`: only sqlite is available"
        )));
    }
    if path.is_empty() {
        return Err(CoreError::Database("database url has no path".into()));
    }
    Ok(path)
}

fn is_temporal_decl(decl: &str) -> bool {
    let decl = decl.to_ascii_uppercase();
    decl.contains("DATE") || decl.contains("TIME")
}

fn native_value(
    column: &str,
    raw: ValueRef<'_>,
    temporal: bool,
) -> Result<ColumnValue, CoreError> {
    match raw {
        ValueRef::Null => Ok(ColumnValue::Null),
        ValueRef::Integer(value) => Ok(ColumnValue::Integer(value)),
        ValueRef::Real(value) => Ok(ColumnValue::Float(value)),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|_| CoreError::UnsupportedValue {
                column: column.to_string(),
                kind: "non UTF-8 text".into(),
            })?;
            if temporal {
                if let Some(when) = parse_temporal(text) {
                    return Ok(ColumnValue::Temporal(when));
                }
            }
            Ok(ColumnValue::from(text))
        }
        ValueRef::Blob(_) => Err(CoreError::UnsupportedValue {
            column: column.to_string(),
            kind: "blob".into(),
        }),
    }
}

fn parse_temporal(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `TO_DATE(text, pattern)`: parses `text` with an Oracle-style pattern and stores it
/// as `YYYY-MM-DD HH:MM:SS` text. NULL in, NULL out; unparsable text is an error.
fn register_to_date(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        TO_DATE_FUNCTION,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            let pattern = ctx.get::<String>(1)?;
            match text {
                None => Ok(None),
                Some(text) => to_date(&text, &pattern)
                    .map(|when| Some(when.format(TEMPORAL_FORMAT).to_string()))
                    .ok_or_else(|| {
                        rusqlite::Error::UserFunctionError(
                            format!("TO_DATE: `{text}` does not match `{pattern}`").into(),
                        )
                    }),
            }
        },
    )
}

fn to_date(text: &str, pattern: &str) -> Option<NaiveDateTime> {
    let format = chrono_format(pattern);
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, &format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, &format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Translates an Oracle date pattern (`YYYY-MM-DD HH24:MI:SS`) into a chrono format.
fn chrono_format(pattern: &str) -> String {
    let upper = pattern.to_ascii_uppercase();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = upper.as_str();
    while !rest.is_empty() {
        if let Some((token, spec)) = DATE_PATTERN_TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))
        {
            out.push_str(spec);
            rest = &rest[token.len()..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }
    out
}

fn db_error(err: rusqlite::Error) -> CoreError {
    CoreError::Database(err.to_string())
}
