//! Catalog record types as the external catalog service returns them.
//!
//! The catalog distinguishes templates (product families) from variants
//! (sellable size/color instances). Both carry catalog-issued numeric ids;
//! nothing in this crate ever mints one.

use serde::{Deserialize, Serialize};

/// A product family record. Owns zero or more variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
}

/// A sellable variant record. Always belongs to exactly one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
    pub template_id: i64,
    /// Current on-hand quantity as the catalog reports it.
    pub stock_on_hand: f64,
}

/// An attribute line as stored on a template: which attribute applies and
/// which value ids are currently allowed. Value ids are resolved to names
/// through a separate value-list lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttributeLine {
    pub attribute_id: i64,
    pub attribute_name: String,
    #[serde(default)]
    pub value_ids: Vec<i64>,
}

/// One entry of an attribute's value list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub id: i64,
    pub name: String,
}

/// The assembled view of an attribute line the resolver works with:
/// value ids already resolved to display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeLine {
    pub attribute_id: i64,
    pub name: String,
    pub allowed_values: Vec<String>,
}

/// A `{id, name}` reference entity (brand value, category). Near-duplicates
/// differing only by case/whitespace are common; see `services::refdata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefEntity {
    pub id: i64,
    pub name: String,
}

/// Brand/category namespace filter for the candidate template search.
/// Scoping is the caller's concern; the engine only forwards it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScope {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub brand_value_id: Option<i64>,
}
