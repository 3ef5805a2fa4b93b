//! Attribute handling for variant creation: fetch-and-cache the attribute
//! lines of a base product, and map the size/color hints parsed from a line
//! name onto the allowed values of those attributes.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::models::AttributeLine;
use crate::catalog::store::CatalogStore;
use crate::services::reconcile::name_parser::ParsedName;
use crate::services::reconcile::normalizer;
use crate::services::reconcile::types::{AttributeChoice, AttributeKind, ReconcileConfig};
use crate::types::errors::StoreResult;

/// Memoizes the resolved attribute lines of base products for the duration
/// of a run (or longer, when the caller shares one across runs). Lines in
/// the same document usually hit a handful of templates, so this collapses
/// the per-line lookups into one fetch per template.
#[derive(Default)]
pub struct AttributeCache {
    lines: Mutex<HashMap<i64, Arc<Vec<AttributeLine>>>>,
    /// Value ids the catalog referenced but could not resolve, recorded at
    /// fetch time. Drained by [`AttributeCache::take_orphans`].
    orphans: Mutex<BTreeSet<i64>>,
}

impl AttributeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the attribute lines of `template_id`, fetching them from the
    /// store on first use.
    ///
    /// The lock is not held across the fetch, so two concurrent misses for
    /// the same template may both hit the store; the second insert simply
    /// overwrites with identical data. A failed fetch caches nothing and is
    /// retried on the next call.
    pub async fn get_or_fetch(
        &self,
        store: &dyn CatalogStore,
        template_id: i64,
    ) -> StoreResult<Arc<Vec<AttributeLine>>> {
        if let Some(hit) = self.lines.lock().await.get(&template_id) {
            return Ok(Arc::clone(hit));
        }

        let fetched = Arc::new(self.fetch(store, template_id).await?);
        self.lines
            .lock()
            .await
            .insert(template_id, Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Drain the orphaned value ids recorded so far, in ascending order.
    pub async fn take_orphans(&self) -> Vec<i64> {
        let mut orphans = self.orphans.lock().await;
        std::mem::take(&mut *orphans).into_iter().collect()
    }

    async fn fetch(
        &self,
        store: &dyn CatalogStore,
        template_id: i64,
    ) -> StoreResult<Vec<AttributeLine>> {
        let raw_lines = store.attribute_lines(template_id).await?;
        let mut lines = Vec::with_capacity(raw_lines.len());
        for raw in raw_lines {
            let values = store.attribute_values(&raw.value_ids).await?;
            if values.len() < raw.value_ids.len() {
                // The store silently drops unknown ids; remember which ones
                // so the run can report them.
                let resolved: HashSet<i64> = values.iter().map(|value| value.id).collect();
                let mut orphans = self.orphans.lock().await;
                orphans.extend(
                    raw.value_ids
                        .iter()
                        .filter(|id| !resolved.contains(id))
                        .copied(),
                );
            }
            lines.push(AttributeLine {
                attribute_id: raw.attribute_id,
                name: raw.attribute_name,
                allowed_values: values.into_iter().map(|value| value.name).collect(),
            });
        }
        Ok(lines)
    }
}

/// Map the parsed hints onto the attribute lines of a matched base product.
///
/// Brand-marker attributes are dropped entirely (brand is matching scope,
/// not a variant axis). Every remaining attribute yields one choice: the
/// first allowed value the hint matches, the raw hint verbatim when nothing
/// matches (the caller decides what to do with an off-list value), or empty
/// when the line carried no hint for that axis.
pub fn resolve_attributes(
    lines: &[AttributeLine],
    parsed: &ParsedName,
    config: &ReconcileConfig,
) -> Vec<AttributeChoice> {
    lines
        .iter()
        .filter(|line| !config.is_brand_attribute(&line.name))
        .map(|line| {
            let kind = config.classify_attribute(&line.name);
            let hint = match kind {
                AttributeKind::Size => parsed.size.as_deref(),
                AttributeKind::Color => parsed.color.as_deref(),
                AttributeKind::Other => None,
            };
            let selected_value = match hint {
                Some(hint) => select_value(line, hint, kind),
                None => String::new(),
            };
            AttributeChoice {
                attribute_id: line.attribute_id,
                name: line.name.clone(),
                allowed_values: line.allowed_values.clone(),
                selected_value,
            }
        })
        .collect()
}

fn select_value(line: &AttributeLine, hint: &str, kind: AttributeKind) -> String {
    let matched = match kind {
        AttributeKind::Size => {
            let wanted = canonical_size(hint);
            line.allowed_values
                .iter()
                .find(|value| canonical_size(value) == wanted)
                .or_else(|| fold_match(&line.allowed_values, hint))
        }
        AttributeKind::Color => fold_match(&line.allowed_values, hint),
        AttributeKind::Other => None,
    };
    match matched {
        // The catalog's spelling of the value, not the supplier's.
        Some(value) => value.clone(),
        None => hint.to_string(),
    }
}

/// First value equal to the hint under folding, else the first where one
/// folded side contains the other.
fn fold_match<'a>(values: &'a [String], hint: &str) -> Option<&'a String> {
    let wanted = normalizer::fold(hint);
    if wanted.is_empty() {
        return None;
    }
    values
        .iter()
        .find(|value| normalizer::fold(value) == wanted)
        .or_else(|| {
            values.iter().find(|value| {
                let folded = normalizer::fold(value);
                !folded.is_empty()
                    && (folded.contains(wanted.as_str()) || wanted.contains(folded.as_str()))
            })
        })
}

/// Canonical form for size comparison: lowercase, unit words collapsed to
/// their single-letter form, all whitespace removed. "9-15 Months" and
/// "9-15M" both become "9-15m".
pub fn canonical_size(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let collapsed = lowered.replace("months", "m").replace("years", "y");
    collapsed.split_whitespace().collect::<Vec<_>>().concat()
}

#[cfg(test)]
#[path = "tests/attributes_tests.rs"]
mod tests;
