//! The fixed type-name → converter table for search fields.
//!
//! Every non-range search field type maps to exactly one [`Converter`].
//! Range types (`<base>-range`) reuse the converter of their base type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use metafield_core::TypedValue;
use rust_decimal::Decimal;
use serde_json::Value;

/// Naive timestamp layouts tried after RFC 3339. All are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Converter {
    String,
    Double,
    Integer,
    Numeric,
    DateTime,
    Object,
}

impl Converter {
    pub const ALL: [Converter; 6] = [
        Converter::String,
        Converter::Double,
        Converter::Integer,
        Converter::Numeric,
        Converter::DateTime,
        Converter::Object,
    ];

    /// Look up the converter for a non-range type name.
    ///
    /// Only the six table names resolve; in particular `"float"` does not.
    pub fn for_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "string" => Some(Converter::String),
            "double" => Some(Converter::Double),
            "integer" => Some(Converter::Integer),
            "numeric" => Some(Converter::Numeric),
            "datetime" => Some(Converter::DateTime),
            "object" => Some(Converter::Object),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Converter::String => "string",
            Converter::Double => "double",
            Converter::Integer => "integer",
            Converter::Numeric => "numeric",
            Converter::DateTime => "datetime",
            Converter::Object => "object",
        }
    }

    /// Convert a raw document value. The error string describes why the value
    /// was rejected; callers attach the field context.
    pub fn convert(self, value: &Value) -> Result<TypedValue, String> {
        match self {
            Converter::String => Ok(TypedValue::String(to_string(value))),
            Converter::Double => to_double(value).map(TypedValue::Double),
            Converter::Integer => to_integer(value).map(TypedValue::Integer),
            Converter::Numeric => to_decimal(value).map(TypedValue::Numeric),
            Converter::DateTime => parse_timestamp(value).map(TypedValue::DateTime),
            Converter::Object => Ok(TypedValue::Object(value.clone())),
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn to_double(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{} does not fit a double", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("'{}' is not a double: {}", s, e)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(format!("expected a number, got {}", describe(other))),
    }
}

fn to_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.is_u64() {
                return Err(format!("{} does not fit a 64-bit integer", n));
            }
            // Fractional numbers truncate toward zero.
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(f.trunc() as i64)
                }
                _ => Err(format!("{} does not fit a 64-bit integer", n)),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("'{}' is not an integer: {}", s, e)),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(format!("expected an integer, got {}", describe(other))),
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("'{}' is not a decimal: {}", text, e))
}

fn to_decimal(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        Value::Bool(b) => Ok(Decimal::from(i64::from(*b))),
        other => Err(format!("expected a decimal, got {}", describe(other))),
    }
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, String> {
    let text = match value {
        Value::String(s) => s.trim(),
        other => return Err(format!("expected a timestamp string, got {}", describe(other))),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is not a recognised timestamp", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn table_round_trips_names() {
        for converter in Converter::ALL {
            assert_eq!(Converter::for_type_name(converter.type_name()), Some(converter));
        }
        assert_eq!(Converter::for_type_name("float"), None);
        assert_eq!(Converter::for_type_name("float-range"), None);
    }

    #[test]
    fn string_renders_scalars() {
        let c = Converter::String;
        assert_eq!(c.convert(&json!("LS8")), Ok(TypedValue::String("LS8".into())));
        assert_eq!(c.convert(&json!(42)), Ok(TypedValue::String("42".into())));
        assert_eq!(c.convert(&json!(true)), Ok(TypedValue::String("true".into())));
    }

    #[test]
    fn double_accepts_numbers_and_numeric_strings() {
        let c = Converter::Double;
        assert_eq!(c.convert(&json!(1.5)), Ok(TypedValue::Double(1.5)));
        assert_eq!(c.convert(&json!(" -2.25 ")), Ok(TypedValue::Double(-2.25)));
        assert!(c.convert(&json!("north")).is_err());
        assert!(c.convert(&json!([1.0])).is_err());
    }

    #[test]
    fn integer_truncates_floats_but_rejects_fractional_text() {
        let c = Converter::Integer;
        assert_eq!(c.convert(&json!(7)), Ok(TypedValue::Integer(7)));
        assert_eq!(c.convert(&json!(3.9)), Ok(TypedValue::Integer(3)));
        assert_eq!(c.convert(&json!(-3.9)), Ok(TypedValue::Integer(-3)));
        assert_eq!(c.convert(&json!("12")), Ok(TypedValue::Integer(12)));
        assert!(c.convert(&json!("3.5")).is_err());
        assert!(c.convert(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn numeric_keeps_decimal_text() {
        let c = Converter::Numeric;
        let expected = Decimal::from_str("0.1").unwrap();
        assert_eq!(c.convert(&json!("0.1")), Ok(TypedValue::Numeric(expected)));
        assert_eq!(c.convert(&json!(0.1)), Ok(TypedValue::Numeric(expected)));
        assert_eq!(
            c.convert(&json!("1.5e3")),
            Ok(TypedValue::Numeric(Decimal::from(1500)))
        );
        assert!(c.convert(&json!("ten")).is_err());
    }

    #[test]
    fn datetime_formats() {
        let c = Converter::DateTime;
        let expected = Utc.with_ymd_and_hms(2014, 7, 26, 23, 48, 0).unwrap();
        assert_eq!(
            c.convert(&json!("2014-07-26T23:48:00Z")),
            Ok(TypedValue::DateTime(expected))
        );
        assert_eq!(
            c.convert(&json!("2014-07-27T09:48:00+10:00")),
            Ok(TypedValue::DateTime(expected))
        );
        assert_eq!(
            c.convert(&json!("2014-07-26 23:48:00")),
            Ok(TypedValue::DateTime(expected))
        );
        let midnight = Utc.with_ymd_and_hms(2014, 7, 26, 0, 0, 0).unwrap();
        assert_eq!(
            c.convert(&json!("2014-07-26")),
            Ok(TypedValue::DateTime(midnight))
        );
        assert!(c.convert(&json!("yesterday")).is_err());
        assert!(c.convert(&json!(1406418480)).is_err());
    }

    #[test]
    fn object_is_identity() {
        let raw = json!({"coord": {"lat": -35.0}});
        assert_eq!(Converter::Object.convert(&raw), Ok(TypedValue::Object(raw.clone())));
    }
}
