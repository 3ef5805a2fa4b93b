use std::collections::{HashMap, HashSet};
use std::sync::Once;

use async_trait::async_trait;

use goodsin::catalog::{
    AttributeValue, CandidateScope, RawAttributeLine, RefEntity, TemplateRecord, VariantRecord,
};
use goodsin::{CatalogStore, InboundLine, ReconcileContext, StoreError, StoreResult};

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Catalog fixture for the end-to-end tests: a small baby-clothing shop
/// with one fully attributed base product, a template carrying its own
/// barcode, and a template with no variants yet.
pub struct SeedCatalog {
    templates: Vec<TemplateRecord>,
    variants: Vec<VariantRecord>,
    attribute_lines: HashMap<i64, Vec<RawAttributeLine>>,
    attribute_values: HashMap<i64, String>,
    fail_barcodes: HashSet<String>,
}

pub fn seeded() -> SeedCatalog {
    let templates = vec![
        TemplateRecord {
            id: 4,
            name: "Booties".to_string(),
            barcode: None,
        },
        TemplateRecord {
            id: 5,
            name: "Alpaca Socks".to_string(),
            barcode: Some("2000000000055".to_string()),
        },
        TemplateRecord {
            id: 6,
            name: "Gift Box".to_string(),
            barcode: Some("2000000000066".to_string()),
        },
    ];
    let variants = vec![
        VariantRecord {
            id: 41,
            name: "Booties (6-9M, Ivory)".to_string(),
            barcode: Some("8719992111053".to_string()),
            template_id: 4,
            stock_on_hand: 2.0,
        },
        VariantRecord {
            id: 51,
            name: "Alpaca Socks (One Size)".to_string(),
            barcode: Some("2000000000051".to_string()),
            template_id: 5,
            stock_on_hand: 7.0,
        },
    ];

    let mut attribute_lines = HashMap::new();
    attribute_lines.insert(
        4,
        vec![
            RawAttributeLine {
                attribute_id: 1,
                attribute_name: "Size".to_string(),
                value_ids: vec![10, 11, 12],
            },
            RawAttributeLine {
                attribute_id: 2,
                attribute_name: "Color".to_string(),
                value_ids: vec![20, 21],
            },
            RawAttributeLine {
                attribute_id: 3,
                attribute_name: "Merk".to_string(),
                value_ids: vec![30],
            },
        ],
    );

    let attribute_values = HashMap::from([
        (10, "6-9M".to_string()),
        (11, "9-15M".to_string()),
        (12, "16-20M".to_string()),
        (20, "Powder Pink".to_string()),
        (21, "Ivory".to_string()),
        (30, "Fonzie".to_string()),
    ]);

    SeedCatalog {
        templates,
        variants,
        attribute_lines,
        attribute_values,
        fail_barcodes: HashSet::new(),
    }
}

impl SeedCatalog {
    /// Make barcode lookups for this barcode fail with a transport error.
    pub fn failing_barcode(mut self, barcode: &str) -> Self {
        self.fail_barcodes.insert(barcode.to_string());
        self
    }
}

#[async_trait]
impl CatalogStore for SeedCatalog {
    async fn find_variant_by_barcode(&self, barcode: &str) -> StoreResult<Option<VariantRecord>> {
        if self.fail_barcodes.contains(barcode) {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        Ok(self
            .variants
            .iter()
            .find(|variant| variant.barcode.as_deref() == Some(barcode))
            .cloned())
    }

    async fn find_template_by_barcode(&self, barcode: &str) -> StoreResult<Option<TemplateRecord>> {
        Ok(self
            .templates
            .iter()
            .find(|template| template.barcode.as_deref() == Some(barcode))
            .cloned())
    }

    async fn variants_of_template(&self, template_id: i64) -> StoreResult<Vec<VariantRecord>> {
        Ok(self
            .variants
            .iter()
            .filter(|variant| variant.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn search_candidate_templates(
        &self,
        _scope: &CandidateScope,
    ) -> StoreResult<Vec<TemplateRecord>> {
        Ok(self.templates.clone())
    }

    async fn attribute_lines(&self, template_id: i64) -> StoreResult<Vec<RawAttributeLine>> {
        Ok(self
            .attribute_lines
            .get(&template_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn attribute_values(&self, value_ids: &[i64]) -> StoreResult<Vec<AttributeValue>> {
        Ok(value_ids
            .iter()
            .filter_map(|id| {
                self.attribute_values.get(id).map(|name| AttributeValue {
                    id: *id,
                    name: name.clone(),
                })
            })
            .collect())
    }
}

pub fn shop_context() -> ReconcileContext {
    ReconcileContext {
        default_category: Some(RefEntity {
            id: 7,
            name: "Baby Clothing".to_string(),
        }),
        default_brand: Some(RefEntity {
            id: 30,
            name: "Fonzie".to_string(),
        }),
        scope: CandidateScope::default(),
    }
}

pub fn line(barcode: &str, name: &str, quantity: f64) -> InboundLine {
    InboundLine {
        barcode: barcode.to_string(),
        name: name.to_string(),
        sku: None,
        quantity,
        cost_price: None,
    }
}
