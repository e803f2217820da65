//! Reconciliation orchestration: creates first, then updates.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use skusync_core::SkuBatchId;

use crate::builder::{CreateBatch, build_creates, build_updates};
use crate::delta::find_deltas;
use crate::missing::find_missing;
use crate::operation::WriteOperation;
use crate::record::{SkuBatchRecord, WarehouseMeta};

/// Fully loaded datasets for one reconciliation pass.
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationInput<'a> {
    /// Authoritative application SkuBatch records.
    pub app_records: &'a [SkuBatchRecord],
    /// SkuBatch ids already present in inventory.
    pub inventory_ids: &'a [SkuBatchId],
    /// Inventory SkuBatch records to compare against.
    pub inventory_records: &'a [SkuBatchRecord],
    /// Warehouses every new SkuBatch is fanned out to.
    pub warehouses: &'a [WarehouseMeta],
}

/// Ordered write operations plus counters for observability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPlan {
    /// Creates, then updates.
    pub operations: Vec<WriteOperation>,
    pub create_count: usize,
    pub update_count: usize,
    /// Missing ids that had no application record.
    pub skipped_count: usize,
    /// Application ids the inventory id list claims but the inventory records lack.
    pub unmatched: Vec<SkuBatchId>,
    /// Inventory ids with no application record; only filled when the counts disagree.
    pub absent_from_app: Vec<SkuBatchId>,
}

struct UpdatePass {
    operations: Vec<WriteOperation>,
    unmatched: Vec<SkuBatchId>,
    absent_from_app: Vec<SkuBatchId>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Run one reconciliation pass over fully loaded datasets.
///
/// Deterministic: identical inputs always produce identical plans.
pub fn reconcile(input: &ReconciliationInput<'_>) -> ReconciliationPlan {
    let creates = plan_creates(input);
    let updates = plan_updates(input);

    let create_count = creates.operations.len();
    let update_count = updates.operations.len();

    let mut operations = creates.operations;
    operations.extend(updates.operations);

    info!(
        create_count,
        update_count,
        skipped_count = creates.skipped_count,
        unmatched_count = updates.unmatched.len(),
        "reconciliation plan built"
    );

    ReconciliationPlan {
        operations,
        create_count,
        update_count,
        skipped_count: creates.skipped_count,
        unmatched: updates.unmatched,
        absent_from_app: updates.absent_from_app,
    }
}

fn plan_creates(input: &ReconciliationInput<'_>) -> CreateBatch {
    let missing = find_missing(
        input.app_records.iter().map(|r| &r.sku_batch_id),
        input.inventory_ids,
    );
    info!(sku_batch_count = missing.len(), "copying new skuBatch records");

    build_creates(&missing, input.app_records, input.warehouses)
}

fn plan_updates(input: &ReconciliationInput<'_>) -> UpdatePass {
    let known: HashSet<&SkuBatchId> = input.inventory_ids.iter().collect();
    let app_subset: Vec<&SkuBatchRecord> = input
        .app_records
        .iter()
        .filter(|r| known.contains(&r.sku_batch_id))
        .collect();

    let mut absent_from_app = Vec::new();
    if app_subset.len() != input.inventory_records.len() {
        absent_from_app = find_missing(
            input.inventory_records.iter().map(|r| &r.sku_batch_id),
            app_subset.iter().map(|r| &r.sku_batch_id),
        );
        warn!(
            app_count = app_subset.len(),
            inventory_count = input.inventory_records.len(),
            absent_from_app = ?absent_from_app,
            "skuBatch count mismatch between app and inventory"
        );
    }

    let report = find_deltas(app_subset.iter().copied(), input.inventory_records);
    for sku_batch_id in &report.unmatched {
        warn!(sku_batch_id = %sku_batch_id, "cannot find matching inventory record");
    }

    UpdatePass {
        operations: report.deltas.iter().flat_map(build_updates).collect(),
        unmatched: report.unmatched,
        absent_from_app,
    }
}
