use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

use super::Representation;

/// Dynamically typed cell value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Char(char),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Binary(Vec<u8>),
}

impl Value {
    /// `None` for NULL, otherwise the representation the value is stored in.
    pub fn representation(&self) -> Option<Representation> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(Representation::Text),
            Self::Int32(_) => Some(Representation::Int32),
            Self::Int64(_) => Some(Representation::Int64),
            Self::Float32(_) => Some(Representation::Float32),
            Self::Float64(_) => Some(Representation::Float64),
            Self::Boolean(_) => Some(Representation::Boolean),
            Self::Char(_) => Some(Representation::Char),
            Self::Date(_) => Some(Representation::Date),
            Self::Timestamp(_) => Some(Representation::Timestamp),
            Self::Binary(_) => Some(Representation::Binary),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Text(_) => "TEXT",
            Self::Int32(_) => "INT32",
            Self::Int64(_) => "INT64",
            Self::Float32(_) => "FLOAT32",
            Self::Float64(_) => "FLOAT64",
            Self::Boolean(_) => "BOOLEAN",
            Self::Char(_) => "CHAR",
            Self::Date(_) => "DATE",
            Self::Timestamp(_) => "TIMESTAMP",
            Self::Binary(_) => "BINARY",
        }
    }
}

/// Canonical timestamp text: `YYYY-MM-DD hh:mm:ss.f`, fraction trimmed of
/// trailing zeros but never empty.
pub(crate) fn timestamp_text(ts: &NaiveDateTime) -> String {
    let nanos = ts.nanosecond() % 1_000_000_000;
    let fraction = if nanos == 0 {
        "0".to_string()
    } else {
        let digits = format!("{:09}", nanos);
        digits.trim_end_matches('0').to_string()
    };
    format!("{}.{}", ts.format("%Y-%m-%d %H:%M:%S"), fraction)
}

/// Shortest round-trip digits; whole numbers of any magnitude keep a `.0`.
fn write_float<F>(f: &mut fmt::Formatter<'_>, value: F) -> fmt::Result
where
    F: Copy + fmt::Display + Into<f64>,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        return write!(f, "NaN");
    }
    if wide.is_infinite() {
        return if wide > 0.0 {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        };
    }

    let digits = value.to_string();
    if digits.contains('.') {
        write!(f, "{}", digits)
    } else {
        write!(f, "{}.0", digits)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Self::Float64(a), Self::Float64(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) => write!(f, "{}", s),
            Self::Int32(i) => write!(f, "{}", i),
            Self::Int64(i) => write!(f, "{}", i),
            Self::Float32(fl) => write_float(f, *fl),
            Self::Float64(fl) => write_float(f, *fl),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Char(c) => write!(f, "{}", c),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(ts) => write!(f, "{}", timestamp_text(ts)),
            Self::Binary(bytes) => {
                write!(f, "\\x")?;
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Conversion from a coerced [`Value`] into a model field type.
///
/// `REPRESENTATION` is the parameter representation a setter for this type
/// declares; the materializer coerces raw cells to it before calling the setter.
pub trait FromValue: Sized {
    const REPRESENTATION: Representation;

    fn from_value(value: Value) -> std::result::Result<Self, String>;
}

fn mismatch(expected: Representation, found: &Value) -> String {
    format!("expected {}, got {}", expected, found.type_name())
}

macro_rules! impl_from_value {
    ($ty:ty, $repr:ident, $variant:ident) => {
        impl FromValue for $ty {
            const REPRESENTATION: Representation = Representation::$repr;

            fn from_value(value: Value) -> std::result::Result<Self, String> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(mismatch(Self::REPRESENTATION, &other)),
                }
            }
        }
    };
}

impl_from_value!(String, Text, Text);
impl_from_value!(i32, Int32, Int32);
impl_from_value!(i64, Int64, Int64);
impl_from_value!(f32, Float32, Float32);
impl_from_value!(f64, Float64, Float64);
impl_from_value!(bool, Boolean, Boolean);
impl_from_value!(char, Char, Char);
impl_from_value!(NaiveDate, Date, Date);
impl_from_value!(NaiveDateTime, Timestamp, Timestamp);
impl_from_value!(Vec<u8>, Binary, Binary);

impl<T: FromValue> FromValue for Option<T> {
    const REPRESENTATION: Representation = T::REPRESENTATION;

    fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
