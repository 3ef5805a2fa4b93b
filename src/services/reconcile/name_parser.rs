//! Best-effort parsing of supplier line names into `{base, size, color}`.
//!
//! Supplier documents encode variant details in a trailing parenthetical,
//! e.g. `"[SKU123] Booties (9-15 months, Powder)"`. The parenthetical is a
//! convention, not a guarantee, so everything here degrades to "the whole
//! string is the base name" and downstream consumers treat size/color as
//! hints with manual override.

use regex::Regex;
use std::sync::LazyLock;

use crate::services::reconcile::normalizer;

/// Bare size tokens and numeric sizes: `M`, `XL`, `86`, `9-15`, `86/92`,
/// `92cm`, `0.5 l`, `9m`, `3y`.
static RE_SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:xs|s|m|l|xl|xxl|\d+(?:[.,]\d+)?(?:\s*[-/]\s*\d+(?:[.,]\d+)?)?\s*(?:cm|mm|ml|cl|kg|g|l|m|y)?)$")
        .expect("Invalid regex")
});

/// Keywords that mark a detail part as a size, wherever they appear in it.
const SIZE_KEYWORDS: &[&str] = &["months", "years", "size"];

/// Parse result. `size`/`color` keep the supplier's original casing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub base: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl ParsedName {
    fn base_only(base: &str) -> Self {
        Self {
            base: base.to_string(),
            size: None,
            color: None,
        }
    }
}

/// Split a free-text line name into base name plus size/color hints.
///
/// A leading `[...]` SKU tag is stripped first. The first top-level
/// parenthetical group holds the details; its comma-separated parts map to
/// `size, color` (anything after the second part is discarded — a known
/// simplification of the supplier convention, kept as documented behavior).
/// A single part is classified size-or-color by the size-indicator
/// heuristic. Missing or unbalanced parentheses mean the whole string is
/// the base name. Total function; never fails.
pub fn parse_product_name(name: &str) -> ParsedName {
    let trimmed = normalizer::strip_sku_prefix(name).trim();

    let Some((open, close)) = first_parenthetical(trimmed) else {
        return ParsedName::base_only(trimmed);
    };

    let base = trimmed[..open].trim().to_string();
    let details = &trimmed[open + 1..close];
    let parts: Vec<&str> = details
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [] => ParsedName {
            base,
            size: None,
            color: None,
        },
        [only] => {
            if is_size_hint(only) {
                ParsedName {
                    base,
                    size: Some((*only).to_string()),
                    color: None,
                }
            } else {
                ParsedName {
                    base,
                    size: None,
                    color: Some((*only).to_string()),
                }
            }
        }
        [size, color, ..] => ParsedName {
            base,
            size: Some((*size).to_string()),
            color: Some((*color).to_string()),
        },
    }
}

/// Whether a lone detail part looks like a size rather than a color.
pub fn is_size_hint(part: &str) -> bool {
    let lower = part.to_lowercase();
    if SIZE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }
    RE_SIZE_TOKEN.is_match(part.trim())
}

/// Byte offsets of the first top-level `(` and its matching `)`.
/// Nested groups stay inside; a stray `)` before any `(` or an unclosed
/// `(` counts as unbalanced and yields `None`.
fn first_parenthetical(text: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| (s, i));
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
#[path = "tests/name_parser_tests.rs"]
mod tests;
