//! Reference data services: brand/category deduplication and the assembly
//! of the default context a reconcile run operates in.

pub mod context;
pub mod dedup;

pub use context::{assemble_context, brand_choices};
pub use dedup::{canonicalize_refs, CanonicalRefs};
