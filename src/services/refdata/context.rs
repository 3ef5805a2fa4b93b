//! Assembles the reference context a reconcile run needs: the canonical
//! list of brand choices and the default category/brand applied to lines
//! that end up as brand new products.

use crate::catalog::models::{CandidateScope, RefEntity};
use crate::catalog::store::CatalogStore;
use crate::services::refdata::dedup::{canonicalize_refs, CanonicalRefs};
use crate::services::reconcile::types::ReconcileContext;
use crate::types::errors::StoreResult;

/// Fetch the values of the brand attribute and collapse near-duplicate
/// spellings into one choice per brand.
pub async fn brand_choices(
    store: &dyn CatalogStore,
    brand_value_ids: &[i64],
) -> StoreResult<CanonicalRefs> {
    let values = store.attribute_values(brand_value_ids).await?;
    let entities: Vec<RefEntity> = values
        .into_iter()
        .map(|value| RefEntity {
            id: value.id,
            name: value.name,
        })
        .collect();
    Ok(canonicalize_refs(&entities))
}

/// Build a [`ReconcileContext`] around one brand and category.
///
/// The brand is picked by name from the canonicalized choices, so any
/// spelling variant selects the same entity. The candidate scope mirrors
/// the defaults: base-product matching only searches within the category
/// and brand that new products would be filed under.
pub async fn assemble_context(
    store: &dyn CatalogStore,
    brand_value_ids: &[i64],
    default_category: Option<RefEntity>,
    default_brand_name: Option<&str>,
) -> StoreResult<ReconcileContext> {
    let choices = brand_choices(store, brand_value_ids).await?;
    let default_brand = default_brand_name.and_then(|name| choices.find(name).cloned());
    let scope = CandidateScope {
        category_id: default_category.as_ref().map(|category| category.id),
        brand_value_id: default_brand.as_ref().map(|brand| brand.id),
    };
    Ok(ReconcileContext {
        default_category,
        default_brand,
        scope,
    })
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod tests;
