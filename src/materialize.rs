//! Turning result rows into records or typed models.
//!
//! Rows arrive as a single-pass iterator of `Result<RawRow>`. Both
//! materializers consume it to the end or stop at the first error; a failed
//! call never returns the rows built so far.

use tracing::{Level, debug_span, event};

use crate::accessor::{RowModel, setters_for};
use crate::coerce::coerce;
use crate::core::{BridgeError, ColumnSet, RawRow, Record, Representation, Result, Value};

/// Builds one [`Record`] per row, in column order, with values taken verbatim.
pub fn materialize_records<I>(columns: &ColumnSet, rows: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Result<RawRow>>,
{
    let mut records = Vec::new();

    for row in rows {
        let row = row?;
        let mut record = Record::with_capacity(columns.len());
        for column in columns.iter() {
            let value = take_cell(&row, column)?;
            record.insert(column, value);
        }
        records.push(record);
    }

    Ok(records)
}

/// Builds one `T` per row by calling the setter matching each column.
///
/// Setters are resolved and the constructor is checked before the first row
/// is read, so a shape mismatch fails even for an empty result.
pub fn materialize_typed<T, I>(columns: &ColumnSet, rows: I) -> Result<Vec<T>>
where
    T: RowModel,
    I: IntoIterator<Item = Result<RawRow>>,
{
    let span = debug_span!(
        "rowbridge.materialize",
        model = T::type_name(),
        columns = columns.len()
    );
    let _enter = span.enter();

    let setters = setters_for::<T, _>(columns.names())?;
    let construct =
        T::constructor().ok_or_else(|| BridgeError::Construction(T::type_name().to_string()))?;

    let mut instances = Vec::new();
    for row in rows {
        let row = row?;
        let mut instance = construct();

        for (column, setter) in columns.iter().zip(&setters) {
            let raw = take_cell(&row, column)?;
            let value = match setter.parameter() {
                Some(parameter) => coerce(raw, parameter)?,
                None => raw,
            };
            setter.set(&mut instance, value)?;
        }

        instances.push(instance);
    }

    event!(Level::DEBUG, rows = instances.len(), "rows materialized");
    Ok(instances)
}

/// The only item of `items`, or `None` when there are zero or several.
pub fn single_row<T>(items: Vec<T>) -> Option<T> {
    if items.len() == 1 {
        items.into_iter().next()
    } else {
        None
    }
}

/// The last value of `record` in iteration order, coerced to `target`.
///
/// With more than one column this picks whichever column came last.
pub fn single_cell(record: &Record, target: Representation) -> Result<Option<Value>> {
    let Some((_, value)) = record.last() else {
        return Ok(None);
    };

    match coerce(value.clone(), target)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

/// Contents of a BLOB column as UTF-8 text; `None` for NULL.
///
/// Text cells are returned as they are, for drivers that already decode
/// character LOBs. Any other representation is a coercion error.
pub fn read_blob(row: &RawRow, column: &str) -> Result<Option<String>> {
    match take_cell(row, column)? {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(text)),
        Value::Binary(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(err) => {
                let hex = Value::Binary(err.into_bytes()).to_string();
                Err(BridgeError::coercion(hex, Representation::Text))
            }
        },
        other => Err(BridgeError::coercion(other.to_string(), Representation::Text)),
    }
}

fn take_cell(row: &RawRow, column: &str) -> Result<Value> {
    row.get(column)
        .cloned()
        .ok_or_else(|| BridgeError::ColumnNotFound(column.to_string()))
}
