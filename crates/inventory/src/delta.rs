//! Field-level delta computation between matched SkuBatch records.

use serde::Serialize;

use skusync_core::{FieldValue, SkuBatchId};

use crate::record::{SkuBatchField, SkuBatchRecord, index_by_id};

/// One detected change: `field` should become `new_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub field: SkuBatchField,
    pub new_value: FieldValue,
}

/// All changes detected for a single SkuBatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDelta {
    pub sku_batch_id: SkuBatchId,
    pub updates: Vec<FieldUpdate>,
}

impl RecordDelta {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Output of [`find_deltas`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaReport {
    /// Deltas with at least one update, in source order.
    pub deltas: Vec<RecordDelta>,
    /// Source ids with no counterpart in the target dataset.
    pub unmatched: Vec<SkuBatchId>,
}

/// Compare every source record with its target counterpart (joined by id).
///
/// Unchanged records are dropped. Source records without a counterpart are
/// listed in [`DeltaReport::unmatched`] rather than treated as errors.
pub fn find_deltas<'s>(
    source: impl IntoIterator<Item = &'s SkuBatchRecord>,
    target: &[SkuBatchRecord],
) -> DeltaReport {
    let target_by_id = index_by_id(target);
    let mut report = DeltaReport::default();

    for source_record in source {
        let Some(target_record) = target_by_id.get(&source_record.sku_batch_id) else {
            report.unmatched.push(source_record.sku_batch_id.clone());
            continue;
        };

        let updates = diff_record(source_record, target_record);
        if !updates.is_empty() {
            report.deltas.push(RecordDelta {
                sku_batch_id: target_record.sku_batch_id.clone(),
                updates,
            });
        }
    }

    report
}

/// Fields of `source` that should be copied onto `target`, in canonical order.
///
/// `skuId` is a backfill field: it is only reported while the target has none.
pub fn diff_record(source: &SkuBatchRecord, target: &SkuBatchRecord) -> Vec<FieldUpdate> {
    SkuBatchField::ALL
        .iter()
        .copied()
        .filter(|field| !(*field == SkuBatchField::SkuId && target.sku_id.is_some()))
        .filter_map(|field| {
            let new_value = field.value_of(source);
            (new_value != field.value_of(target)).then_some(FieldUpdate { field, new_value })
        })
        .collect()
}
