//! Reconciles inbound supplier documents against the product catalog.
//!
//! Each document line is classified into exactly one catalog action:
//! update stock on an existing variant, create a variant under an existing
//! base product, or create a brand new product. Lookups are barcode-first;
//! free-text names are parsed and matched only when no barcode hit exists.
//! The catalog itself stays behind the [`catalog::CatalogStore`] trait, so
//! the engine runs against any backend that can answer its six lookups.

pub mod catalog;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use catalog::CatalogStore;
pub use services::reconcile::{
    classify_lines, classify_lines_concurrent, classify_lines_with, AttributeCache, BatchReport,
    InboundLine, LineAction, ReconcileConfig, ReconcileContext,
};
pub use types::errors::{StoreError, StoreResult};
