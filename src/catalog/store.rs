//! Lookup interface onto the external catalog service.
//!
//! Every method is a single network round trip that either returns a result
//! or fails with a [`StoreError`]. Retries and timeouts are the
//! implementation's responsibility; the engine treats each call as one
//! fallible operation and catches failures at the per-line boundary.

use async_trait::async_trait;

use crate::catalog::models::{
    AttributeValue, CandidateScope, RawAttributeLine, TemplateRecord, VariantRecord,
};
use crate::types::errors::StoreResult;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Exact variant lookup by barcode.
    async fn find_variant_by_barcode(&self, barcode: &str) -> StoreResult<Option<VariantRecord>>;

    /// Exact template lookup by barcode (templates can carry their own
    /// barcode independently of their variants).
    async fn find_template_by_barcode(&self, barcode: &str)
        -> StoreResult<Option<TemplateRecord>>;

    /// All variants belonging to a template, in catalog order.
    async fn variants_of_template(&self, template_id: i64) -> StoreResult<Vec<VariantRecord>>;

    /// Templates within the given brand/category namespace, in catalog order.
    /// The order is load-bearing: the matcher is first-match-wins.
    async fn search_candidate_templates(
        &self,
        scope: &CandidateScope,
    ) -> StoreResult<Vec<TemplateRecord>>;

    /// Attribute lines declared on a template.
    async fn attribute_lines(&self, template_id: i64) -> StoreResult<Vec<RawAttributeLine>>;

    /// Resolve attribute value ids to `{id, name}` entries. Ids unknown to
    /// the catalog are simply absent from the response.
    async fn attribute_values(&self, value_ids: &[i64]) -> StoreResult<Vec<AttributeValue>>;
}
