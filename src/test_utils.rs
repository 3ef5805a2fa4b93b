use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::sync::Once;

use async_trait::async_trait;

use crate::catalog::models::{
    AttributeValue, CandidateScope, RawAttributeLine, TemplateRecord, VariantRecord,
};
use crate::catalog::store::CatalogStore;
use crate::services::reconcile::types::InboundLine;
use crate::types::errors::{StoreError, StoreResult};

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// In-memory [`CatalogStore`] for tests: fixture data via builder methods,
/// per-method call recording, and targeted failure injection.
#[derive(Default)]
pub struct MemoryCatalog {
    templates: Vec<TemplateRecord>,
    variants: Vec<VariantRecord>,
    attribute_lines: HashMap<i64, Vec<RawAttributeLine>>,
    attribute_values: BTreeMap<i64, String>,
    fail_variant_barcodes: HashSet<String>,
    fail_template_searches: AtomicUsize,
    fail_attribute_fetches: AtomicUsize,
    calls: Mutex<Vec<&'static str>>,
    last_scope: Mutex<Option<CandidateScope>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, id: i64, name: &str, barcode: Option<&str>) -> Self {
        self.templates.push(TemplateRecord {
            id,
            name: name.to_string(),
            barcode: barcode.map(|b| b.to_string()),
        });
        self
    }

    pub fn with_variant(
        mut self,
        id: i64,
        template_id: i64,
        name: &str,
        barcode: &str,
        stock_on_hand: f64,
    ) -> Self {
        self.variants.push(VariantRecord {
            id,
            name: name.to_string(),
            barcode: Some(barcode.to_string()),
            template_id,
            stock_on_hand,
        });
        self
    }

    /// Attach an attribute line to a template and register its values so
    /// they resolve by id.
    pub fn with_attribute(
        mut self,
        template_id: i64,
        attribute_id: i64,
        name: &str,
        values: &[(i64, &str)],
    ) -> Self {
        for (value_id, value_name) in values {
            self.attribute_values
                .insert(*value_id, (*value_name).to_string());
        }
        self.attribute_lines
            .entry(template_id)
            .or_default()
            .push(RawAttributeLine {
                attribute_id,
                attribute_name: name.to_string(),
                value_ids: values.iter().map(|(id, _)| *id).collect(),
            });
        self
    }

    /// Attach an attribute line referencing raw value ids without
    /// registering names for them; unregistered ids resolve to nothing.
    pub fn with_attribute_value_ids(
        mut self,
        template_id: i64,
        attribute_id: i64,
        name: &str,
        value_ids: &[i64],
    ) -> Self {
        self.attribute_lines
            .entry(template_id)
            .or_default()
            .push(RawAttributeLine {
                attribute_id,
                attribute_name: name.to_string(),
                value_ids: value_ids.to_vec(),
            });
        self
    }

    pub fn with_attribute_value(mut self, id: i64, name: &str) -> Self {
        self.attribute_values.insert(id, name.to_string());
        self
    }

    /// Make `find_variant_by_barcode` fail for this barcode.
    pub fn failing_variant_lookup(mut self, barcode: &str) -> Self {
        self.fail_variant_barcodes.insert(barcode.to_string());
        self
    }

    /// Make the next `n` candidate searches fail before succeeding.
    pub fn failing_template_searches(self, n: usize) -> Self {
        self.fail_template_searches.store(n, Ordering::SeqCst);
        self
    }

    /// Make the next `n` attribute line fetches fail before succeeding.
    pub fn failing_attribute_fetches(self, n: usize) -> Self {
        self.fail_attribute_fetches.store(n, Ordering::SeqCst);
        self
    }

    pub fn call_count(&self, method: &'static str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|name| **name == method)
            .count()
    }

    pub fn last_scope(&self) -> Option<CandidateScope> {
        self.last_scope.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_variant_by_barcode(&self, barcode: &str) -> StoreResult<Option<VariantRecord>> {
        self.record("find_variant_by_barcode");
        if self.fail_variant_barcodes.contains(barcode) {
            return Err(StoreError::Transport("injected failure".to_string()));
        }
        Ok(self
            .variants
            .iter()
            .find(|variant| variant.barcode.as_deref() == Some(barcode))
            .cloned())
    }

    async fn find_template_by_barcode(&self, barcode: &str) -> StoreResult<Option<TemplateRecord>> {
        self.record("find_template_by_barcode");
        Ok(self
            .templates
            .iter()
            .find(|template| template.barcode.as_deref() == Some(barcode))
            .cloned())
    }

    async fn variants_of_template(&self, template_id: i64) -> StoreResult<Vec<VariantRecord>> {
        self.record("variants_of_template");
        Ok(self
            .variants
            .iter()
            .filter(|variant| variant.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn search_candidate_templates(
        &self,
        scope: &CandidateScope,
    ) -> StoreResult<Vec<TemplateRecord>> {
        self.record("search_candidate_templates");
        *self.last_scope.lock().unwrap() = Some(scope.clone());
        let remaining = self.fail_template_searches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_template_searches
                .store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Transport("injected failure".to_string()));
        }
        Ok(self.templates.clone())
    }

    async fn attribute_lines(&self, template_id: i64) -> StoreResult<Vec<RawAttributeLine>> {
        self.record("attribute_lines");
        let remaining = self.fail_attribute_fetches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_attribute_fetches
                .store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Transport("injected failure".to_string()));
        }
        Ok(self
            .attribute_lines
            .get(&template_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn attribute_values(&self, value_ids: &[i64]) -> StoreResult<Vec<AttributeValue>> {
        self.record("attribute_values");
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

pub fn line(barcode: &str, name: &str, quantity: f64) -> InboundLine {
    InboundLine {
        barcode: barcode.to_string(),
        name: name.to_string(),
        sku: None,
        quantity,
        cost_price: None,
    }
}
