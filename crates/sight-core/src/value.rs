//! Scalar field values and normalised storage types.
//!
//! Storage backends name their column types differently (`VARCHAR` in `DuckDB`,
//! `STRING` in warehouse schemas). [`FieldType::parse`] folds those spellings
//! into one vocabulary so a contract written against one backend can be
//! checked against another.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Primitive type of a staged field, as declared by a contract or reported by
/// a staging store.
///
/// Serialized as its canonical uppercase name (`"STRING"`, `"TIMESTAMP"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Timestamp,
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Float,
    Boolean,
    /// Any other type, kept as its full uppercase name including any
    /// precision suffix.
    Other(String),
}

impl FieldType {
    /// Normalise a storage type name.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. Only
    /// exact aliases fold together (`VARCHAR`/`TEXT`/`STRING`,
    /// `BIGINT`/`INT64`, `DOUBLE`/`FLOAT64`, `BOOL`/`BOOLEAN`). Types that
    /// differ in width, precision or time zone handling, such as `DATETIME`,
    /// `TIMESTAMPTZ`, `TINYINT` or `DECIMAL(9,6)`, stay distinct as
    /// [`FieldType::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let upper = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        let base = upper.split('(').next().unwrap_or_default().trim();

        match (base, upper.as_str()) {
            ("STRING" | "VARCHAR" | "TEXT", _) => Self::String,
            (_, "TIMESTAMP" | "TIMESTAMP_US") => Self::Timestamp,
            (_, "BIGINT" | "INT64" | "INT8" | "LONG") => Self::Integer,
            (_, "DOUBLE" | "FLOAT64" | "FLOAT8") => Self::Float,
            (_, "BOOLEAN" | "BOOL") => Self::Boolean,
            (_, "TIMESTAMPTZ") => Self::Other("TIMESTAMP WITH TIME ZONE".to_string()),
            _ => Self::Other(upper.clone()),
        }
    }

    /// Canonical uppercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Timestamp => "TIMESTAMP",
            Self::String => "STRING",
            Self::Integer => "BIGINT",
            Self::Float => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.as_str().to_string()
    }
}

impl JsonSchema for FieldType {
    fn schema_name() -> Cow<'static, str> {
        "FieldType".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        String::json_schema(generator)
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A single scalar cell of a staged record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The storage type family of this value. `None` for null.
    #[must_use]
    pub const fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(FieldType::String),
            Self::Timestamp(_) => Some(FieldType::Timestamp),
            Self::Integer(_) => Some(FieldType::Integer),
            Self::Float(_) => Some(FieldType::Float),
            Self::Boolean(_) => Some(FieldType::Boolean),
        }
    }

    /// Render the value as display text. Timestamps use RFC 3339 with
    /// microsecond precision. `None` for null.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Timestamp(ts) => Some(ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(x) => Some(x.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
