//! Product reconciliation — turns supplier document lines into catalog
//! actions.
//!
//! Classification is barcode-first (variant barcode, then template
//! barcode), with a fallback path that parses the free-text line name and
//! matches it against a scoped pool of existing base products. Every line
//! ends up as exactly one of `update_stock`, `create_variant` or
//! `create_product`, or as a reported per-line error.

// Module structure
pub mod attributes;
pub mod engine;
pub mod matcher;
pub mod name_parser;
pub mod normalizer;
pub mod types;

// Public surface consumed by callers
pub use attributes::AttributeCache;
pub use engine::{classify_lines, classify_lines_concurrent, classify_lines_with, DEFAULT_FAN_OUT};
pub use name_parser::{parse_product_name, ParsedName};
pub use types::{
    AttributeChoice, BatchReport, BatchSummary, ClassifiedLine, InboundLine, LineAction, LineError,
    ProgressUpdate, ReconcileConfig, ReconcileContext,
};
