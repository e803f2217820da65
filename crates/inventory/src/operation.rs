//! Structured write operations handed to a sink.
//!
//! The engine never renders these to SQL or JSON bodies. Rendering, quoting
//! and parameter binding happen at the sink boundary.

use serde::Serialize;

use skusync_core::{FieldValue, SkuBatchId};

use crate::record::DerivedInventoryRecord;

/// Inventory tables the sync writes to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryTable {
    /// Per-warehouse inventory rows.
    Inventory,
    /// Rolled-up inventory, one row per SkuBatch.
    InventoryAggregate,
}

impl InventoryTable {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryTable::Inventory => "inventory",
            InventoryTable::InventoryAggregate => "inventory_aggregate",
        }
    }
}

impl core::fmt::Display for InventoryTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `column = value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub column: &'static str,
    pub value: FieldValue,
}

impl Assignment {
    pub fn new(column: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Update of existing rows for one SkuBatch in one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperation {
    pub table: InventoryTable,
    pub sku_batch_id: SkuBatchId,
    pub assignments: Vec<Assignment>,
}

/// A single write the sink must apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteOperation {
    /// Insert a new inventory row.
    Create(DerivedInventoryRecord),
    /// Update existing rows matching the SkuBatch id.
    Update(UpdateOperation),
}

impl WriteOperation {
    /// Table the operation targets. Creates always land in [`InventoryTable::Inventory`].
    pub fn table(&self) -> InventoryTable {
        match self {
            WriteOperation::Create(_) => InventoryTable::Inventory,
            WriteOperation::Update(update) => update.table,
        }
    }

    pub fn sku_batch_id(&self) -> &SkuBatchId {
        match self {
            WriteOperation::Create(record) => record.sku_batch_id(),
            WriteOperation::Update(update) => &update.sku_batch_id,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, WriteOperation::Create(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, WriteOperation::Update(_))
    }
}
