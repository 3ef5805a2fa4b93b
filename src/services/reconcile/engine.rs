//! The classification engine: walks a supplier document line by line and
//! decides whether each line updates stock on an existing variant, adds a
//! variant to an existing base product, or creates a brand new product.
//!
//! Lookups go barcode-first (variant barcode, then template barcode), and
//! only fall back to name parsing plus base-product matching when no
//! barcode hit exists. One line failing a catalog lookup never aborts the
//! batch; the failure is reported next to the successful classifications.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use tokio::sync::OnceCell;

use crate::catalog::models::TemplateRecord;
use crate::catalog::store::CatalogStore;
use crate::services::reconcile::attributes::{resolve_attributes, AttributeCache};
use crate::services::reconcile::matcher::match_base_product;
use crate::services::reconcile::name_parser::parse_product_name;
use crate::services::reconcile::types::{
    BatchReport, BatchSummary, ClassifiedLine, InboundLine, LineAction, LineError, ProgressUpdate,
    ReconcileConfig, ReconcileContext,
};
use crate::types::errors::StoreResult;

/// Fan-out used by [`classify_lines_concurrent`] callers that have no
/// reason to pick their own.
pub const DEFAULT_FAN_OUT: usize = 4;

/// Classify a whole document sequentially with a fresh attribute cache and
/// no cancellation or progress reporting.
pub async fn classify_lines(
    store: &dyn CatalogStore,
    lines: &[InboundLine],
    ctx: &ReconcileContext,
    config: &ReconcileConfig,
) -> BatchReport {
    let cache = AttributeCache::new();
    let cancel_flag = AtomicBool::new(false);
    classify_lines_with(store, lines, ctx, config, &cache, &cancel_flag, |_| {}).await
}

/// Classify a whole document sequentially.
///
/// `cache` may be shared across runs to keep attribute lines warm. Setting
/// `cancel_flag` stops the run before the next line; everything classified
/// up to that point is returned with `summary.cancelled` set. `on_progress`
/// fires once per line as it is picked up.
pub async fn classify_lines_with<F>(
    store: &dyn CatalogStore,
    lines: &[InboundLine],
    ctx: &ReconcileContext,
    config: &ReconcileConfig,
    cache: &AttributeCache,
    cancel_flag: &AtomicBool,
    mut on_progress: F,
) -> BatchReport
where
    F: FnMut(ProgressUpdate),
{
    let started_at = Utc::now();
    let total = lines.len();
    log::info!("Reconciling {} document lines", total);

    let candidates = OnceCell::new();
    let mut seen_barcodes: HashSet<String> = HashSet::new();

    let mut classified = Vec::new();
    let mut errors = Vec::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;
    let mut cancelled = false;

    for (index, line) in lines.iter().enumerate() {
        if is_cancelled(cancel_flag) {
            cancelled = true;
            break;
        }

        on_progress(ProgressUpdate {
            current: index + 1,
            total,
            barcode: line.barcode.clone(),
        });

        let barcode = line.barcode.trim();
        if barcode.is_empty() {
            skipped += 1;
            log::debug!("Skipping line {} without barcode: '{}'", index, line.name);
            continue;
        }
        if !seen_barcodes.insert(barcode.to_string()) {
            // Duplicate barcodes are classified independently; the counter
            // lets the caller warn about suspect documents.
            duplicates += 1;
            log::debug!("Barcode '{}' repeats at line {}", barcode, index);
        }

        match classify_one(store, line, barcode, ctx, config, cache, &candidates).await {
            Ok(action) => {
                classified.push(ClassifiedLine {
                    line_index: index,
                    barcode: barcode.to_string(),
                    action,
                });
            }
            Err(error) => {
                log::warn!(
                    "Failed to classify line {} (barcode '{}'): {}",
                    index,
                    barcode,
                    error
                );
                errors.push(LineError {
                    line_index: index,
                    barcode: barcode.to_string(),
                    message: error.to_string(),
                });
            }
        }
    }

    let tally = RunTally {
        total_lines: total,
        skipped,
        duplicates,
        cancelled,
    };
    build_report(classified, errors, tally, cache.take_orphans().await, started_at)
}

/// Classify a whole document with up to `fan_out` lines in flight at once.
///
/// Results come back in input order. Lines still share one candidate pool
/// and one attribute cache, so concurrency does not multiply catalog reads.
pub async fn classify_lines_concurrent(
    store: &dyn CatalogStore,
    lines: &[InboundLine],
    ctx: &ReconcileContext,
    config: &ReconcileConfig,
    fan_out: usize,
) -> BatchReport {
    let started_at = Utc::now();
    log::info!(
        "Reconciling {} document lines (fan-out {})",
        lines.len(),
        fan_out.max(1)
    );
    let cache = AttributeCache::new();
    let candidates = OnceCell::new();

    let outcomes: Vec<LineOutcome> = {
        let cache = &cache;
        let candidates = &candidates;
        stream::iter(lines.iter().enumerate().map(|(index, line)| async move {
            let barcode = line.barcode.trim();
            if barcode.is_empty() {
                log::debug!("Skipping line {} without barcode: '{}'", index, line.name);
                return LineOutcome::Skipped;
            }
            match classify_one(store, line, barcode, ctx, config, cache, candidates).await {
                Ok(action) => LineOutcome::Classified(ClassifiedLine {
                    line_index: index,
                    barcode: barcode.to_string(),
                    action,
                }),
                Err(error) => {
                    log::warn!(
                        "Failed to classify line {} (barcode '{}'): {}",
                        index,
                        barcode,
                        error
                    );
                    LineOutcome::Failed(LineError {
                        line_index: index,
                        barcode: barcode.to_string(),
                        message: error.to_string(),
                    })
                }
            }
        }))
        .buffered(fan_out.max(1))
        .collect()
        .await
    };

    let mut classified = Vec::new();
    let mut errors = Vec::new();
    let mut skipped = 0usize;
    for outcome in outcomes {
        match outcome {
            LineOutcome::Classified(line) => classified.push(line),
            LineOutcome::Failed(error) => errors.push(error),
            LineOutcome::Skipped => skipped += 1,
        }
    }

    let tally = RunTally {
        total_lines: lines.len(),
        skipped,
        duplicates: count_duplicate_barcodes(lines),
        cancelled: false,
    };
    build_report(classified, errors, tally, cache.take_orphans().await, started_at)
}

/// Decide the action for a single line. Barcode wins over name: an exact
/// variant hit first, then a template-level barcode booked onto its first
/// variant. A template barcode with no variants yet falls through to the
/// name path, so the line can still become that template's first variant.
async fn classify_one(
    store: &dyn CatalogStore,
    line: &InboundLine,
    barcode: &str,
    ctx: &ReconcileContext,
    config: &ReconcileConfig,
    cache: &AttributeCache,
    candidates: &OnceCell<Vec<TemplateRecord>>,
) -> StoreResult<LineAction> {
    if let Some(variant) = store.find_variant_by_barcode(barcode).await? {
        return Ok(LineAction::UpdateStock {
            variant_id: variant.id,
            template_id: variant.template_id,
            current_stock: variant.stock_on_hand,
            delta_qty: line.quantity,
        });
    }

    if let Some(template) = store.find_template_by_barcode(barcode).await? {
        let variants = store.variants_of_template(template.id).await?;
        if let Some(first) = variants.first() {
            return Ok(LineAction::UpdateStock {
                variant_id: first.id,
                template_id: template.id,
                current_stock: first.stock_on_hand,
                delta_qty: line.quantity,
            });
        }
    }

    let parsed = parse_product_name(&line.name);
    // The candidate pool is fetched once per run, on the first line that
    // needs the name path. A failed fetch is retried by the next line.
    let pool = candidates
        .get_or_try_init(|| store.search_candidate_templates(&ctx.scope))
        .await?;

    match match_base_product(&parsed.base, pool, config) {
        Some(template) => {
            let attribute_lines = cache.get_or_fetch(store, template.id).await?;
            let attributes = resolve_attributes(&attribute_lines, &parsed, config);
            Ok(LineAction::CreateVariant {
                base_product_id: template.id,
                base_product_name: template.name.clone(),
                attributes,
                delta_qty: line.quantity,
            })
        }
        None => Ok(LineAction::CreateProduct {
            parsed_name: parsed.base,
            detected_size: parsed.size,
            detected_color: parsed.color,
            default_category: ctx.default_category.clone(),
            default_brand: ctx.default_brand.clone(),
            delta_qty: line.quantity,
            cost_price: line.cost_price,
        }),
    }
}

enum LineOutcome {
    Classified(ClassifiedLine),
    Failed(LineError),
    Skipped,
}

struct RunTally {
    total_lines: usize,
    skipped: usize,
    duplicates: usize,
    cancelled: bool,
}

fn build_report(
    classified: Vec<ClassifiedLine>,
    errors: Vec<LineError>,
    tally: RunTally,
    orphaned_value_ids: Vec<i64>,
    started_at: DateTime<Utc>,
) -> BatchReport {
    let mut update_stock = 0usize;
    let mut create_variant = 0usize;
    let mut create_product = 0usize;
    for line in &classified {
        match &line.action {
            LineAction::UpdateStock { .. } => update_stock += 1,
            LineAction::CreateVariant { .. } => create_variant += 1,
            LineAction::CreateProduct { .. } => create_product += 1,
        }
    }

    log::info!(
        "Reconcile run complete: {} classified ({} update_stock, {} create_variant, {} create_product), {} failed, {} skipped, {} duplicate barcodes",
        classified.len(),
        update_stock,
        create_variant,
        create_product,
        errors.len(),
        tally.skipped,
        tally.duplicates
    );

    let summary = BatchSummary {
        total_lines: tally.total_lines,
        classified: classified.len(),
        failed: errors.len(),
        skipped_empty_barcode: tally.skipped,
        update_stock,
        create_variant,
        create_product,
        duplicate_barcodes: tally.duplicates,
        orphaned_value_ids,
        cancelled: tally.cancelled,
        started_at,
        finished_at: Utc::now(),
    };
    BatchReport {
        classified,
        errors,
        summary,
    }
}

/// Occurrences beyond the first of every non-empty trimmed barcode.
fn count_duplicate_barcodes(lines: &[InboundLine]) -> usize {
    let mut seen = HashSet::new();
    lines
        .iter()
        .map(|line| line.barcode.trim())
        .filter(|barcode| !barcode.is_empty() && !seen.insert(barcode.to_string()))
        .count()
}

fn is_cancelled(cancel_flag: &AtomicBool) -> bool {
    cancel_flag.load(Ordering::Relaxed)
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
