// ============================================================================
// rowbridge Library
// ============================================================================

//! Bridge between SQL result rows and Rust values.
//!
//! Rows are materialized either as ordered [`Record`]s or as instances of a
//! [`RowModel`] type, whose setters are found by case- and
//! punctuation-insensitive name matching against column labels. The
//! [`JsonEncoder`] turns records and models back into JSON text in which every
//! value is a quoted, sanitized string.
//!
//! ```
//! use rowbridge::{ColumnSet, JsonEncoder, RawRow, RowModel, Value, materialize_typed};
//!
//! #[derive(Debug, RowModel)]
//! struct User {
//!     id: i64,
//!     first_name: String,
//! }
//!
//! # fn main() -> rowbridge::Result<()> {
//! let columns = ColumnSet::new(["ID", "FIRST_NAME"]);
//! let row: RawRow = [("ID", Value::Int32(7)), ("FIRST_NAME", Value::from("Ada"))]
//!     .into_iter()
//!     .collect();
//! let rows = vec![Ok(row)];
//!
//! let users: Vec<User> = materialize_typed(&columns, rows)?;
//! assert_eq!(users[0].id, 7);
//!
//! let json = JsonEncoder::encode_model(&users[0], &["id", "firstName"])?;
//! assert_eq!(json, r#"{"id": "7", "firstName": "Ada"}"#);
//! # Ok(())
//! # }
//! ```

extern crate self as rowbridge;

pub mod accessor;
pub mod coerce;
pub mod config;
pub mod core;
pub mod json;
pub mod materialize;
pub mod naming;
pub mod result;
pub mod statement;

// Re-export main types for convenience
pub use accessor::{
    AccessKind, Constructor, Getter, Method, MethodKind, RowModel, Setter, getters_for,
    resolve_accessors, setters_for,
};
pub use coerce::coerce;
pub use config::BridgeConfig;
pub use core::{BridgeError, ColumnSet, FromValue, RawRow, Record, Representation, Result, Value};
pub use json::{JsonEncoder, JsonResponseWriter, sanitize};
pub use materialize::{
    materialize_records, materialize_typed, read_blob, single_cell, single_row,
};
pub use naming::normalize;
pub use result::ResultSet;
pub use statement::{
    Binding, OutParameter, StatementFacade, Statements, bind_positions, has_inputs,
};

pub use rowbridge_derive::RowModel;
