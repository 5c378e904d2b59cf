use serde::{Deserialize, Serialize};

use crate::core::{Representation, Result};

/// Settings for the statement helpers and the JSON response writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Representation single-cell queries coerce to when none is given
    pub default_cell_representation: Representation,

    /// Log every statement text at debug level
    pub log_statements: bool,

    /// Terminate each written document with a newline
    pub trailing_newline: bool,

    /// Text written in place of an absent document (an empty array)
    pub absent_document: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_cell_representation: Representation::Text,
            log_statements: false,
            trailing_newline: true,
            absent_document: "null".to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object; missing keys keep their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowbridge::{BridgeConfig, Representation};
    ///
    /// let config = BridgeConfig::from_json(r#"{ "default_cell_representation": "Int64" }"#).unwrap();
    /// assert_eq!(config.default_cell_representation, Representation::Int64);
    /// assert!(config.trailing_newline);
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the default single-cell representation
    pub fn default_cell_representation(mut self, representation: Representation) -> Self {
        self.default_cell_representation = representation;
        self
    }

    /// Enable or disable statement logging
    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    /// Enable or disable the trailing newline after each document
    pub fn trailing_newline(mut self, enabled: bool) -> Self {
        self.trailing_newline = enabled;
        self
    }

    /// Set the text written for an absent document
    pub fn absent_document(mut self, text: &str) -> Self {
        self.absent_document = text.to_string();
        self
    }
}
