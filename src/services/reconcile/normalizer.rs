//! Text normalization for supplier line names and catalog entries.
//! Every matcher and resolver in this crate compares through these helpers.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for a leading `[...]` SKU tag plus surrounding whitespace.
static RE_SKU_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*").expect("Invalid regex"));

/// Lowercase and trim. The canonical comparison key for reference-entity
/// names (brand/category dedup).
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Remove one leading `[...]` bracket group (supplier SKU tag) and the
/// whitespace around it. No bracket group, or an unclosed bracket, returns
/// the input unchanged.
pub fn strip_sku_prefix(name: &str) -> &str {
    match RE_SKU_PREFIX.find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    }
}

/// Fold text for name comparison.
///
/// Pipeline:
/// 1. Transliterate non-Latin characters to ASCII via deunicode, so accented
///    supplier text still matches plain catalog entries
/// 2. Lowercase
/// 3. Collapse whitespace runs to single spaces and trim
pub fn fold(text: &str) -> String {
    deunicode(text)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold and split into whitespace-separated tokens, in input order.
pub fn tokenize(text: &str) -> Vec<String> {
    fold(text)
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}
