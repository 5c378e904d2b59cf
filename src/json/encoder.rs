//! Hand-rolled JSON encoder.
//!
//! Every value is emitted as a quoted string. Values go through text coercion,
//! sanitization, backslash doubling and quote escaping, in that order. Keys
//! are written verbatim.

use std::borrow::Borrow;

use crate::accessor::{Method, RowModel, getters_for};
use crate::coerce::to_text;
use crate::core::{BridgeError, Record, Result, Value};

use super::sanitizer::sanitize;

/// Builds JSON objects and arrays from attribute/value pairs.
pub struct JsonEncoder;

impl JsonEncoder {
    /// Encodes ordered pairs as one object: `{"k1": "v1", "k2": "v2"}`.
    pub fn encode_pairs<I, K, V>(pairs: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Borrow<Value>,
    {
        let mut json = String::new();
        Self::write_object(&mut json, pairs).map_err(BridgeError::into_encoding)?;
        Ok(json)
    }

    pub fn encode_record(record: &Record) -> Result<String> {
        Self::encode_pairs(record)
    }

    /// Encodes the named attributes of `model`, read through its getters.
    pub fn encode_model<T, S>(model: &T, attributes: &[S]) -> Result<String>
    where
        T: RowModel,
        S: AsRef<str>,
    {
        let getters = getters_for::<T, S>(attributes).map_err(BridgeError::into_encoding)?;
        let mut json = String::new();
        Self::write_model(&mut json, model, attributes, &getters)
            .map_err(BridgeError::into_encoding)?;
        Ok(json)
    }

    /// Encodes records as an array keyed by the first record's keys.
    ///
    /// Returns `None` for an empty slice rather than `[]`.
    pub fn encode_records(records: &[Record]) -> Result<Option<String>> {
        let Some(first) = records.first() else {
            return Ok(None);
        };
        let keys: Vec<&str> = first.keys().collect();

        let mut json = String::from("[");
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                json.push(',');
            }
            let pairs = keys
                .iter()
                .map(|key| (*key, record.get(key).cloned().unwrap_or(Value::Null)));
            Self::write_object(&mut json, pairs).map_err(BridgeError::into_encoding)?;
        }
        json.push(']');

        Ok(Some(json))
    }

    /// Encodes models as an array; getters are resolved once for the call.
    ///
    /// Returns `None` for an empty slice rather than `[]`.
    pub fn encode_models<T, S>(models: &[T], attributes: &[S]) -> Result<Option<String>>
    where
        T: RowModel,
        S: AsRef<str>,
    {
        if models.is_empty() {
            return Ok(None);
        }

        let getters = getters_for::<T, S>(attributes).map_err(BridgeError::into_encoding)?;

        let mut json = String::from("[");
        for (i, model) in models.iter().enumerate() {
            if i > 0 {
                json.push(',');
            }
            Self::write_model(&mut json, model, attributes, &getters)
                .map_err(BridgeError::into_encoding)?;
        }
        json.push(']');

        Ok(Some(json))
    }

    /// Escapes a single value the way it appears between the quotes.
    pub fn escape_value(value: &Value) -> Result<String> {
        let text = to_text(value)?.unwrap_or_default();
        Ok(sanitize(&text).replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn write_model<T, S>(
        json: &mut String,
        model: &T,
        attributes: &[S],
        getters: &[Method<T>],
    ) -> Result<()>
    where
        S: AsRef<str>,
    {
        let values = getters
            .iter()
            .map(|getter| getter.get(model))
            .collect::<Result<Vec<_>>>()?;
        Self::write_object(json, attributes.iter().zip(values))
    }

    fn write_object<I, K, V>(json: &mut String, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Borrow<Value>,
    {
        json.push('{');
        for (i, (key, value)) in pairs.into_iter().enumerate() {
            if i != 0 {
                json.push_str(", ");
            }
            let escaped = Self::escape_value(value.borrow())?;
            json.push('"');
            json.push_str(key.as_ref());
            json.push_str("\": \"");
            json.push_str(&escaped);
            json.push('"');
        }
        json.push('}');
        Ok(())
    }
}
