//! SkuBatch reconciliation engine.
//!
//! This crate compares the application SkuBatch dataset with the inventory
//! dataset and produces the write operations that bring inventory back in
//! line. It is deterministic domain logic only (no IO, no SQL, no HTTP):
//! fetching datasets and applying operations belong to `skusync-infra`.

pub mod builder;
pub mod delta;
pub mod missing;
pub mod operation;
pub mod reconcile;
pub mod record;

pub use builder::{CreateBatch, build_creates, build_updates, fan_out};
pub use delta::{DeltaReport, FieldUpdate, RecordDelta, diff_record, find_deltas};
pub use missing::find_missing;
pub use operation::{Assignment, InventoryTable, UpdateOperation, WriteOperation};
pub use reconcile::{ReconciliationInput, ReconciliationPlan, reconcile};
pub use record::{DerivedInventoryRecord, SkuBatchField, SkuBatchRecord, WarehouseMeta, columns};
