pub mod error;
pub mod record;
pub mod types;
pub mod value;

pub use error::{BridgeError, Result};
pub use record::{RawRow, Record};
pub use types::{ColumnSet, Representation, Row};
pub use value::{FromValue, Value};
