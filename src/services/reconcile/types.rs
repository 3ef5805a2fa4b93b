//! Shared types for the reconcile service: inbound document lines, the
//! per-line classification outcome, batch reporting, and the tunable
//! configuration the parser/matcher/attribute stages read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::models::{CandidateScope, RefEntity};
use crate::services::reconcile::normalizer;

/// One line of a supplier document, as handed to the engine.
///
/// `quantity` is the received amount and becomes the stock delta of the
/// resulting action; `cost_price` only matters when a brand new product has
/// to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundLine {
    pub barcode: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub cost_price: Option<f64>,
}

/// An attribute of the matched base product together with the value chosen
/// for the new variant. `selected_value` is either one of `allowed_values`
/// or the raw hint carried over verbatim when nothing matched; it is empty
/// when the line gave no hint for this attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeChoice {
    pub attribute_id: i64,
    pub name: String,
    pub allowed_values: Vec<String>,
    pub selected_value: String,
}

/// The action a classified line asks the caller to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LineAction {
    /// The barcode resolved to an existing variant: adjust its stock.
    #[serde(rename_all = "camelCase")]
    UpdateStock {
        variant_id: i64,
        template_id: i64,
        current_stock: f64,
        delta_qty: f64,
    },
    /// The name matched an existing base product: add a variant to it.
    #[serde(rename_all = "camelCase")]
    CreateVariant {
        base_product_id: i64,
        base_product_name: String,
        attributes: Vec<AttributeChoice>,
        delta_qty: f64,
    },
    /// Nothing in the catalog corresponds to this line: create a product.
    #[serde(rename_all = "camelCase")]
    CreateProduct {
        parsed_name: String,
        detected_size: Option<String>,
        detected_color: Option<String>,
        default_category: Option<RefEntity>,
        default_brand: Option<RefEntity>,
        delta_qty: f64,
        cost_price: Option<f64>,
    },
}

impl LineAction {
    /// Stable label used in logs and batch counters.
    pub fn label(&self) -> &'static str {
        match self {
            LineAction::UpdateStock { .. } => "update_stock",
            LineAction::CreateVariant { .. } => "create_variant",
            LineAction::CreateProduct { .. } => "create_product",
        }
    }
}

impl std::fmt::Display for LineAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A successfully classified line. `line_index` is the position in the
/// input batch; errored lines are reported separately, so indices in
/// `BatchReport::classified` can have gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedLine {
    pub line_index: usize,
    pub barcode: String,
    #[serde(flatten)]
    pub action: LineAction,
}

/// A line the engine could not classify because the catalog failed
/// mid-lookup. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineError {
    pub line_index: usize,
    pub barcode: String,
    pub message: String,
}

/// Progress callback payload, emitted as each line is picked up (skipped
/// lines included).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub barcode: String,
}

/// Aggregate counters for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_lines: usize,
    pub classified: usize,
    pub failed: usize,
    pub skipped_empty_barcode: usize,
    pub update_stock: usize,
    pub create_variant: usize,
    pub create_product: usize,
    pub duplicate_barcodes: usize,
    /// Attribute value ids referenced by the catalog but no longer
    /// resolvable, collected across the whole run for diagnostics.
    pub orphaned_value_ids: Vec<i64>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Everything one engine run produces: per-line outcomes, per-line
/// failures, and the run counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub classified: Vec<ClassifiedLine>,
    pub errors: Vec<LineError>,
    pub summary: BatchSummary,
}

/// Defaults applied when a line ends up as `CreateProduct`, plus the
/// candidate scope used when searching base products by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileContext {
    #[serde(default)]
    pub default_category: Option<RefEntity>,
    #[serde(default)]
    pub default_brand: Option<RefEntity>,
    #[serde(default)]
    pub scope: CandidateScope,
}

/// Which role an attribute of a base product plays when mapping parsed
/// hints onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Size,
    Color,
    Other,
}

/// Tunables for parsing and matching. The defaults encode the supplier
/// conventions the engine was calibrated against; callers override per
/// deployment, not per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileConfig {
    /// Attribute names containing one of these markers carry the brand,
    /// which is scope, not variation: they never become variant attributes.
    pub brand_attribute_markers: Vec<String>,
    /// Attribute names containing one of these are treated as the size axis.
    pub size_attribute_keywords: Vec<String>,
    /// Attribute names containing one of these are treated as the color axis.
    pub color_attribute_keywords: Vec<String>,
    /// Tokens must be longer than this many characters to participate in
    /// the all-words matching pass.
    pub significant_token_len: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            brand_attribute_markers: vec!["merk".to_string()],
            size_attribute_keywords: vec!["size".to_string(), "maat".to_string()],
            color_attribute_keywords: vec![
                "color".to_string(),
                "colour".to_string(),
                "kleur".to_string(),
            ],
            significant_token_len: 3,
        }
    }
}

impl ReconcileConfig {
    /// Whether the attribute name marks the brand axis. Both sides are
    /// folded, so configured markers are case/accent insensitive.
    pub fn is_brand_attribute(&self, attribute_name: &str) -> bool {
        let folded = normalizer::fold(attribute_name);
        self.brand_attribute_markers
            .iter()
            .any(|marker| folded.contains(normalizer::fold(marker).as_str()))
    }

    /// Classify an attribute name into the axis it represents.
    pub fn classify_attribute(&self, attribute_name: &str) -> AttributeKind {
        let folded = normalizer::fold(attribute_name);
        if self
            .size_attribute_keywords
            .iter()
            .any(|kw| folded.contains(normalizer::fold(kw).as_str()))
        {
            AttributeKind::Size
        } else if self
            .color_attribute_keywords
            .iter()
            .any(|kw| folded.contains(normalizer::fold(kw).as_str()))
        {
            AttributeKind::Color
        } else {
            AttributeKind::Other
        }
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
