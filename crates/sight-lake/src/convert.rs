//! Conversion between `DuckDB` values and [`FieldValue`].

use chrono::DateTime;
use duckdb::types::{TimeUnit, Value};
use sight_core::FieldValue;

use crate::LakeError;

/// Timestamp text format bound to `?::TIMESTAMP` parameters.
const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Convert a value read from `column` into a [`FieldValue`].
///
/// # Errors
///
/// Returns [`LakeError::UnsupportedValue`] for nested, binary, or
/// out-of-range values.
pub fn from_duckdb(column: &str, value: Value) -> Result<FieldValue, LakeError> {
    let unsupported = |kind: String| LakeError::UnsupportedValue {
        column: column.to_string(),
        kind,
    };

    let converted = match value {
        Value::Null => FieldValue::Null,
        Value::Boolean(b) => FieldValue::Boolean(b),
        Value::TinyInt(n) => FieldValue::Integer(n.into()),
        Value::SmallInt(n) => FieldValue::Integer(n.into()),
        Value::Int(n) => FieldValue::Integer(n.into()),
        Value::BigInt(n) => FieldValue::Integer(n),
        Value::UTinyInt(n) => FieldValue::Integer(n.into()),
        Value::USmallInt(n) => FieldValue::Integer(n.into()),
        Value::UInt(n) => FieldValue::Integer(n.into()),
        Value::UBigInt(n) => match i64::try_from(n) {
            Ok(n) => FieldValue::Integer(n),
            Err(_) => return Err(unsupported(format!("UBigInt({n})"))),
        },
        Value::Float(x) => FieldValue::Float(x.into()),
        Value::Double(x) => FieldValue::Float(x),
        Value::Text(s) | Value::Enum(s) => FieldValue::Text(s),
        Value::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.checked_mul(1_000_000),
                TimeUnit::Millisecond => raw.checked_mul(1_000),
                TimeUnit::Microsecond => Some(raw),
                TimeUnit::Nanosecond => Some(raw / 1_000),
            };
            match micros.and_then(DateTime::from_timestamp_micros) {
                Some(ts) => FieldValue::Timestamp(ts),
                None => return Err(unsupported(format!("Timestamp({raw})"))),
            }
        }
        other => return Err(unsupported(format!("{other:?}"))),
    };
    Ok(converted)
}

/// Convert a [`FieldValue`] into a bindable `DuckDB` parameter.
///
/// Timestamps are bound as text; the INSERT casts them with `::TIMESTAMP`.
#[must_use]
pub fn to_duckdb(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Timestamp(ts) => Value::Text(ts.format(SQL_TIMESTAMP_FORMAT).to_string()),
        FieldValue::Integer(n) => Value::BigInt(*n),
        FieldValue::Float(x) => Value::Double(*x),
        FieldValue::Boolean(b) => Value::Boolean(*b),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(TimeUnit::Second, 1_717_225_800)]
    #[case(TimeUnit::Millisecond, 1_717_225_800_000)]
    #[case(TimeUnit::Microsecond, 1_717_225_800_000_000)]
    #[case(TimeUnit::Nanosecond, 1_717_225_800_000_000_000)]
    fn timestamps_normalise_to_utc(#[case] unit: TimeUnit, #[case] raw: i64) {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 7, 10, 0).unwrap();
        let value = from_duckdb("when", Value::Timestamp(unit, raw)).unwrap();
        assert_eq!(value, FieldValue::Timestamp(expected));
    }

    #[test]
    fn integers_widen_to_i64() {
        assert_eq!(
            from_duckdb("n", Value::Int(7)).unwrap(),
            FieldValue::Integer(7)
        );
        assert!(from_duckdb("n", Value::UBigInt(u64::MAX)).is_err());
    }

    #[test]
    fn blobs_are_unsupported() {
        let err = from_duckdb("raw", Value::Blob(vec![1, 2])).unwrap_err();
        assert!(matches!(err, LakeError::UnsupportedValue { ref column, .. } if column == "raw"));
    }

    #[test]
    fn timestamps_bind_as_sql_text() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 7, 30, 0).unwrap();
        assert_eq!(
            to_duckdb(&FieldValue::Timestamp(ts)),
            Value::Text("2025-06-01 07:30:00.000000".into())
        );
        assert_eq!(to_duckdb(&FieldValue::Null), Value::Null);
    }
}
