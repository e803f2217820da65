//! Translation of detection results into write operations.

use tracing::{error, info};

use skusync_core::SkuBatchId;

use crate::delta::RecordDelta;
use crate::operation::{Assignment, InventoryTable, UpdateOperation, WriteOperation};
use crate::record::{DerivedInventoryRecord, SkuBatchRecord, WarehouseMeta, index_by_id};

/// Tables every SkuBatch update is written to, in order.
const UPDATE_TABLES: [InventoryTable; 2] =
    [InventoryTable::Inventory, InventoryTable::InventoryAggregate];

/// Create operations plus the number of ids that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBatch {
    pub operations: Vec<WriteOperation>,
    /// Missing ids with no backing source record; skipped, not fatal.
    pub skipped_count: usize,
}

/// One derived row per warehouse for `record`.
pub fn fan_out(record: &SkuBatchRecord, warehouses: &[WarehouseMeta]) -> Vec<DerivedInventoryRecord> {
    warehouses
        .iter()
        .map(|warehouse| DerivedInventoryRecord::for_warehouse(record, warehouse))
        .collect()
}

/// Build create operations for every missing id, fanned out per warehouse.
///
/// Ids absent from `source` are logged and counted; the rest of the batch is
/// still built.
pub fn build_creates(
    missing: &[SkuBatchId],
    source: &[SkuBatchRecord],
    warehouses: &[WarehouseMeta],
) -> CreateBatch {
    let source_by_id = index_by_id(source);
    let mut batch = CreateBatch::default();

    for sku_batch_id in missing {
        let Some(record) = source_by_id.get(sku_batch_id) else {
            error!(sku_batch_id = %sku_batch_id, "no records found in app SkuBatch");
            batch.skipped_count += 1;
            continue;
        };

        batch
            .operations
            .extend(fan_out(record, warehouses).into_iter().map(WriteOperation::Create));
    }

    info!(
        count = batch.operations.len(),
        bad_sku_batch_record_count = batch.skipped_count,
        "created inserts"
    );

    batch
}

/// Build the update operations for one delta: the same assignments against
/// the inventory table and then the aggregate table.
///
/// An empty delta produces no operations.
pub fn build_updates(delta: &RecordDelta) -> Vec<WriteOperation> {
    if delta.is_empty() {
        return Vec::new();
    }

    let assignments: Vec<Assignment> = delta
        .updates
        .iter()
        .map(|update| Assignment::new(update.field.column(), update.new_value.clone()))
        .collect();

    UPDATE_TABLES
        .iter()
        .map(|table| {
            WriteOperation::Update(UpdateOperation {
                table: *table,
                sku_batch_id: delta.sku_batch_id.clone(),
                assignments: assignments.clone(),
            })
        })
        .collect()
}
