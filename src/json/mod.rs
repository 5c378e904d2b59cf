//! JSON output
//!
//! - `encoder.rs` - object/array assembly (JsonEncoder)
//! - `sanitizer.rs` - parser-hostile character removal
//! - `response.rs` - writing documents to a response channel

mod encoder;
mod response;
pub mod sanitizer;

pub use encoder::JsonEncoder;
pub use response::JsonResponseWriter;
pub use sanitizer::{sanitize, sanitize_with};
