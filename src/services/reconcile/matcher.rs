//! Base-product matching: find the existing template a supplier line name
//! refers to, inside an already brand/category-scoped candidate set.
//!
//! Two passes, first structurally-valid candidate wins, no scoring:
//! substring containment first (exact and near-exact names are the common
//! case), then the all-significant-words pass. Callers depend on the
//! deterministic first-match behavior, so candidate iteration order is part
//! of the contract.

use crate::catalog::models::TemplateRecord;
use crate::services::reconcile::normalizer;
use crate::services::reconcile::types::ReconcileConfig;

#[cfg(feature = "debug_matcher")]
use log::debug;

/// Match a parsed base name against the candidate templates.
///
/// Returns the first candidate whose folded name contains the folded base
/// name (or vice versa), else the first candidate containing every
/// significant token of the base name, else `None`.
pub fn match_base_product<'a>(
    base_name: &str,
    candidates: &'a [TemplateRecord],
    config: &ReconcileConfig,
) -> Option<&'a TemplateRecord> {
    let folded_base = normalizer::fold(base_name);
    // An empty base can never match; without this guard substring
    // containment would accept every candidate.
    if folded_base.is_empty() {
        return None;
    }

    if let Some(hit) = substring_pass(&folded_base, candidates) {
        #[cfg(feature = "debug_matcher")]
        debug!(
            "[MATCHER] substring_pass hit | base='{}' template_id={} name='{}'",
            base_name, hit.id, hit.name
        );
        return Some(hit);
    }

    let tokens = significant_tokens(&folded_base, config.significant_token_len);
    if tokens.is_empty() {
        // A name made of short/common words only cannot be matched
        // meaningfully.
        #[cfg(feature = "debug_matcher")]
        debug!("[MATCHER] no significant tokens | base='{}'", base_name);
        return None;
    }

    let hit = all_words_pass(&tokens, candidates);
    #[cfg(feature = "debug_matcher")]
    match hit {
        Some(tpl) => debug!(
            "[MATCHER] all_words_pass hit | base='{}' tokens={:?} template_id={}",
            base_name, tokens, tpl.id
        ),
        None => debug!(
            "[MATCHER] no match | base='{}' tokens={:?}",
            base_name, tokens
        ),
    }
    hit
}

/// Stage 1: mutual substring containment on folded names.
fn substring_pass<'a>(
    folded_base: &str,
    candidates: &'a [TemplateRecord],
) -> Option<&'a TemplateRecord> {
    candidates.iter().find(|candidate| {
        let folded_name = normalizer::fold(&candidate.name);
        !folded_name.is_empty()
            && (folded_name.contains(folded_base) || folded_base.contains(folded_name.as_str()))
    })
}

/// Stage 2: every significant token of the base name must appear in the
/// candidate's folded name. Requiring all tokens (not any) avoids false
/// positives from a single common word.
fn all_words_pass<'a>(
    tokens: &[String],
    candidates: &'a [TemplateRecord],
) -> Option<&'a TemplateRecord> {
    candidates.iter().find(|candidate| {
        let folded_name = normalizer::fold(&candidate.name);
        tokens.iter().all(|token| folded_name.contains(token))
    })
}

/// Whitespace tokens of the folded base name longer than `min_len`
/// characters. Short tokens are articles/units noise in product names.
fn significant_tokens(folded_base: &str, min_len: usize) -> Vec<String> {
    folded_base
        .split_whitespace()
        .filter(|token| token.chars().count() > min_len)
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
