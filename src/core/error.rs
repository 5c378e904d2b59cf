use super::types::Representation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("No method found for attribute name '{attribute}' in type {type_name}")]
    AccessorNotFound {
        attribute: String,
        type_name: String,
    },

    #[error("Type {0} has no zero-argument constructor")]
    Construction(String),

    #[error("Cannot coerce '{text}' to {target}")]
    Coercion {
        text: String,
        target: Representation,
    },

    #[error("Couldn't create JSON from provided values: {0}")]
    Encoding(Box<BridgeError>),

    #[error("Column '{0}' not found in row")]
    ColumnNotFound(String),

    #[error("Invocation of '{method}' failed: {message}")]
    Invocation { method: String, message: String },

    #[error("Statement error: {0}")]
    Statement(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    pub fn coercion(text: impl Into<String>, target: Representation) -> Self {
        Self::Coercion {
            text: text.into(),
            target,
        }
    }

    /// Wraps `self` as an encoding failure; already-wrapped errors stay single-level.
    pub fn into_encoding(self) -> Self {
        match self {
            Self::Encoding(_) => self,
            other => Self::Encoding(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
