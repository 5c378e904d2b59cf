//! Value coercion between representations.
//!
//! Conversions go through a canonical text form: the source value is
//! stringified, then parsed into the requested representation. NULL and values
//! already in the target representation pass through untouched, and so does
//! anything whose target cannot be parsed into (binary).

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::{BridgeError, Representation, Result, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn coerce(value: Value, target: Representation) -> Result<Value> {
    let source = match value.representation() {
        None => return Ok(value),
        Some(source) => source,
    };

    if source == target {
        return Ok(value);
    }

    if !target.is_parse_target() {
        return Ok(value);
    }

    let text = match value {
        Value::Text(text) => text,
        other => other.to_string(),
    };

    parse_text(text, target)
}

/// Text form of a value as used by the JSON encoder; `None` for NULL.
pub fn to_text(value: &Value) -> Result<Option<String>> {
    match coerce(value.clone(), Representation::Text)? {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(text)),
        other => Ok(Some(other.to_string())),
    }
}

fn parse_text(text: String, target: Representation) -> Result<Value> {
    let parsed = match target {
        Representation::Text => Some(Value::Text(text.clone())),
        Representation::Int32 => text.parse::<i32>().ok().map(Value::Int32),
        Representation::Int64 => text.parse::<i64>().ok().map(Value::Int64),
        Representation::Float32 => text.trim().parse::<f32>().ok().map(Value::Float32),
        Representation::Float64 => text.trim().parse::<f64>().ok().map(Value::Float64),
        Representation::Boolean => parse_bool(&text).map(Value::Boolean),
        Representation::Char => text.chars().next().map(Value::Char),
        Representation::Date => NaiveDate::parse_from_str(&text, DATE_FORMAT)
            .ok()
            .map(Value::Date),
        Representation::Timestamp => NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
            .ok()
            .map(Value::Timestamp),
        Representation::Binary => None,
    };

    parsed.ok_or_else(|| BridgeError::coercion(text, target))
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timestamp(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_null_passes_through_every_target() {
        for target in [
            Representation::Text,
            Representation::Int32,
            Representation::Timestamp,
            Representation::Binary,
        ] {
            assert_eq!(coerce(Value::Null, target).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_same_representation_is_untouched() {
        let value = Value::Text("  not trimmed ".into());
        assert_eq!(coerce(value.clone(), Representation::Text).unwrap(), value);
        assert_eq!(
            coerce(Value::Float64(f64::NAN), Representation::Float64).unwrap(),
            Value::Float64(f64::NAN)
        );
    }

    #[test]
    fn test_text_to_numbers() {
        assert_eq!(coerce("42".into(), Representation::Int32).unwrap(), Value::Int32(42));
        assert_eq!(coerce("-7".into(), Representation::Int64).unwrap(), Value::Int64(-7));
        assert_eq!(coerce("2.5".into(), Representation::Float64).unwrap(), Value::Float64(2.5));
        assert_eq!(coerce("1e3".into(), Representation::Float32).unwrap(), Value::Float32(1000.0));
    }

    #[test]
    fn test_cross_numeric_goes_through_text() {
        assert_eq!(coerce(Value::Int32(5), Representation::Int64).unwrap(), Value::Int64(5));
        assert_eq!(coerce(Value::Int64(5), Representation::Float64).unwrap(), Value::Float64(5.0));
        // "5.0" is not an integer literal.
        assert!(matches!(
            coerce(Value::Float64(5.0), Representation::Int32),
            Err(BridgeError::Coercion { ref text, target: Representation::Int32 }) if text == "5.0"
        ));
        assert!(coerce(Value::Int64(i64::MAX), Representation::Int32).is_err());
    }

    #[test]
    fn test_large_whole_floats_are_not_integers() {
        for value in [Value::Float64(1e16), Value::Float32(1e16)] {
            assert!(matches!(
                coerce(value.clone(), Representation::Int64),
                Err(BridgeError::Coercion { ref text, .. }) if text == "10000000000000000.0"
            ));
            assert_eq!(
                coerce(value, Representation::Text).unwrap(),
                Value::Text("10000000000000000.0".into())
            );
        }
    }

    #[test]
    fn test_booleans_are_strict() {
        assert_eq!(coerce("TRUE".into(), Representation::Boolean).unwrap(), Value::Boolean(true));
        assert_eq!(coerce("false".into(), Representation::Boolean).unwrap(), Value::Boolean(false));
        assert!(coerce("yes".into(), Representation::Boolean).is_err());
        assert!(coerce(Value::Int32(1), Representation::Boolean).is_err());
        assert_eq!(
            coerce(Value::Boolean(true), Representation::Text).unwrap(),
            Value::Text("true".into())
        );
    }

    #[test]
    fn test_char_takes_first_character() {
        assert_eq!(coerce("xyz".into(), Representation::Char).unwrap(), Value::Char('x'));
        assert_eq!(coerce(Value::Int32(91), Representation::Char).unwrap(), Value::Char('9'));
        assert!(coerce("".into(), Representation::Char).is_err());
    }

    #[test]
    fn test_dates_and_timestamps() {
        assert_eq!(
            coerce("2024-02-29".into(), Representation::Date).unwrap(),
            Value::Date(date(2024, 2, 29))
        );
        assert_eq!(
            coerce("2024-02-29 13:14:15".into(), Representation::Timestamp).unwrap(),
            Value::Timestamp(timestamp("2024-02-29 13:14:15"))
        );
        assert_eq!(
            coerce(Value::Timestamp(timestamp("2024-02-29 13:14:15.5")), Representation::Text)
                .unwrap(),
            Value::Text("2024-02-29 13:14:15.5".into())
        );
        assert!(coerce("2024-02-30".into(), Representation::Date).is_err());
        // A timestamp's text is not a date literal.
        assert!(
            coerce(Value::Timestamp(timestamp("2024-02-29 00:00:00")), Representation::Date)
                .is_err()
        );
    }

    #[test]
    fn test_unsupported_target_is_fail_open() {
        let value = Value::Text("payload".into());
        assert_eq!(coerce(value.clone(), Representation::Binary).unwrap(), value);
        assert_eq!(
            coerce(Value::Binary(vec![1, 2]), Representation::Text).unwrap(),
            Value::Text("\\x0102".into())
        );
    }

    #[test]
    fn test_text_round_trip() {
        let samples = [
            Value::Int32(-12),
            Value::Int64(9_007_199_254_740_993),
            Value::Float64(0.1),
            Value::Float64(-3.0),
            Value::Float64(f64::INFINITY),
            Value::Float32(1.25),
            Value::Boolean(false),
            Value::Char('é'),
            Value::Date(date(1999, 12, 31)),
            Value::Timestamp(timestamp("2001-02-03 04:05:06.000000789")),
        ];

        for value in samples {
            let target = value.representation().unwrap();
            let text = coerce(value.clone(), Representation::Text).unwrap();
            assert_eq!(coerce(text, target).unwrap(), value);
        }
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&Value::Null).unwrap(), None);
        assert_eq!(to_text(&Value::Int64(3)).unwrap(), Some("3".to_string()));
    }
}
