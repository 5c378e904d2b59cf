//! Name canonicalization used to match columns and attributes to accessors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new("[^A-Za-z0-9]").unwrap();
}

/// Drops every character outside `[A-Za-z0-9]` and lowercases the rest.
///
/// `first_name`, `FirstName` and `FIRST-NAME` all normalize to `firstname`.
pub fn normalize(name: &str) -> String {
    NON_ALPHANUMERIC.replace_all(name, "").to_ascii_lowercase()
}
