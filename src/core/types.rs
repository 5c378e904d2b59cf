use serde::{Deserialize, Serialize};
use std::fmt;

use super::Value;

pub type Row = Vec<Value>;

/// Static representation a value can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Representation {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    Char,
    Date,
    Timestamp,
    Binary,
}

impl Representation {
    /// Whether the coercer knows how to parse text into this representation.
    ///
    /// Binary is a valid source but values are never parsed into it.
    pub fn is_parse_target(&self) -> bool {
        !matches!(self, Self::Binary)
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "TEXT"),
            Self::Int32 => write!(f, "INT32"),
            Self::Int64 => write!(f, "INT64"),
            Self::Float32 => write!(f, "FLOAT32"),
            Self::Float64 => write!(f, "FLOAT64"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Char => write!(f, "CHAR"),
            Self::Date => write!(f, "DATE"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Binary => write!(f, "BINARY"),
        }
    }
}

/// Ordered column labels of a result.
///
/// Order is significant: it drives record key order, JSON key order and the
/// positional coercion of procedure outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    names: Vec<String>,
}

impl ColumnSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
