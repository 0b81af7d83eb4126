// crates/psgc-core/src/text.rs

//! Text folding for sorting and matching.
//!
//! Division names arrive with arbitrary casing and the occasional accented
//! character (e.g. "Peñablanca"). All ordering and name matching in this
//! crate goes through [`fold_key`] so the two compare equal where a user
//! would expect them to.

use deunicode::deunicode;

/// Accent-insensitive, case-insensitive sort/match key.
///
/// ```
/// use psgc_core::text::fold_key;
///
/// assert_eq!(fold_key("Peñablanca"), "penablanca");
/// assert_eq!(fold_key("QUEZON City"), "quezon city");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode(s).to_ascii_lowercase()
}
