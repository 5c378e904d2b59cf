//! Removal of characters that break downstream `JSON.parse` consumers.

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Control characters and the Latin-1 range 192..=253.
    static ref DENYLIST: HashSet<u32> = (0u32..=31).chain(192..=253).collect();
}

/// Forces the process-wide denylist to be built now instead of on first use.
pub fn init() {
    lazy_static::initialize(&DENYLIST);
}

pub fn denylist() -> &'static HashSet<u32> {
    &DENYLIST
}

pub fn sanitize(text: &str) -> String {
    sanitize_with(&DENYLIST, text)
}

/// Drops every character whose code point is in `denylist`, keeping the
/// relative order of the rest.
pub fn sanitize_with(denylist: &HashSet<u32>, text: &str) -> String {
    text.chars()
        .filter(|c| !denylist.contains(&u32::from(*c)))
        .collect()
}
