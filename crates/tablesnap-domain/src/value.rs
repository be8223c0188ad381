//! Tagged column values and their serde mapping.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize, Serializer,
};

/// Text layout used whenever a temporal value is rendered as text.
///
/// Matches the `YYYY-MM-DD HH24:MI:SS` pattern of the default date override, so a
/// captured date survives the trip through an artifact and back into `TO_DATE`.
pub const TEMPORAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell captured from, or replayed into, a table.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Temporal(NaiveDateTime),
}

impl ColumnValue {
    /// True for a real null and for text that spells `null` in any case.
    ///
    /// Artifacts written in the plain-text form cannot tell the two apart.
    pub fn is_null(&self) -> bool {
        match self {
            ColumnValue::Null => true,
            ColumnValue::Text(text) => text.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }

    /// Whether the value's external representation is a string.
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnValue::Text(_) | ColumnValue::Temporal(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Null => "null",
            ColumnValue::Text(_) => "text",
            ColumnValue::Integer(_) => "integer",
            ColumnValue::Float(_) => "float",
            ColumnValue::Boolean(_) => "boolean",
            ColumnValue::Temporal(_) => "temporal",
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => f.write_str("null"),
            ColumnValue::Text(text) => f.write_str(text),
            ColumnValue::Integer(value) => write!(f, "{value}"),
            ColumnValue::Float(value) => write!(f, "{value}"),
            ColumnValue::Boolean(value) => write!(f, "{value}"),
            ColumnValue::Temporal(value) => write!(f, "{}", value.format(TEMPORAL_FORMAT)),
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Float(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for ColumnValue {
    fn from(value: NaiveDateTime) -> Self {
        ColumnValue::Temporal(value)
    }
}

impl Serialize for ColumnValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ColumnValue::Null => serializer.serialize_unit(),
            ColumnValue::Text(text) => serializer.serialize_str(text),
            ColumnValue::Integer(value) => serializer.serialize_i64(*value),
            ColumnValue::Float(value) => serializer.serialize_f64(*value),
            ColumnValue::Boolean(value) => serializer.serialize_bool(*value),
            ColumnValue::Temporal(value) => {
                serializer.collect_str(&value.format(TEMPORAL_FORMAT))
            }
        }
    }
}

// Temporal values come back as text: artifacts carry no type tag.
struct ColumnValueVisitor;

impl<'de> Visitor<'de> for ColumnValueVisitor {
    type Value = ColumnValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a flat column value (null, string, number or boolean)")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<ColumnValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Boolean(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ColumnValue, E> {
        match i64::try_from(value) {
            Ok(value) => Ok(ColumnValue::Integer(value)),
            Err(_) => Ok(ColumnValue::Float(value as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<ColumnValue, E> {
        Ok(ColumnValue::Text(value))
    }
}

impl<'de> Deserialize<'de> for ColumnValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ColumnValueVisitor)
    }
}
