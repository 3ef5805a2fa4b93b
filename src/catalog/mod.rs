//! Data-access boundary: record types plus the `CatalogStore` trait the
//! surrounding application implements over its catalog transport.

pub mod models;
pub mod store;

pub use models::{
    AttributeLine, AttributeValue, CandidateScope, RawAttributeLine, RefEntity, TemplateRecord,
    VariantRecord,
};
pub use store::CatalogStore;
