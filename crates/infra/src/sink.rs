//! Write sinks: where reconciliation output is applied.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use skusync_inventory::WriteOperation;

use crate::sql;

#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("database error: {0}")]
    Database(String),
    #[error("operation {index} for sku batch {sku_batch_id} failed: {reason}")]
    Operation {
        index: usize,
        sku_batch_id: String,
        reason: String,
    },
}

/// Applies write operations in the order given.
///
/// Implementations do not retry; the first failure is returned to the caller.
#[async_trait]
pub trait WriteSink: Send + Sync {
    async fn apply(&self, operations: &[WriteOperation]) -> Result<(), SinkError>;
}

/// In-memory sink for tests/dev: records everything it is given.
#[derive(Debug, Default)]
pub struct InMemoryWriteSink {
    applied: RwLock<Vec<WriteOperation>>,
}

impl InMemoryWriteSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation applied so far, in order.
    pub fn applied(&self) -> Vec<WriteOperation> {
        self.applied
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WriteSink for InMemoryWriteSink {
    async fn apply(&self, operations: &[WriteOperation]) -> Result<(), SinkError> {
        self.applied
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(operations);
        Ok(())
    }
}

/// Dry-run sink: renders each operation to SQL and logs it instead of executing.
#[derive(Debug, Default)]
pub struct StatementLogSink {
    statements: RwLock<Vec<String>>,
}

impl StatementLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered statements, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WriteSink for StatementLogSink {
    async fn apply(&self, operations: &[WriteOperation]) -> Result<(), SinkError> {
        let rendered: Vec<String> = operations.iter().map(sql::render).collect();
        for statement in &rendered {
            info!(statement = %statement, "dry run");
        }

        self.statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skusync_core::{FieldValue, SkuBatchId};
    use skusync_inventory::{Assignment, InventoryTable, UpdateOperation};

    fn delete_update(table: InventoryTable) -> WriteOperation {
        WriteOperation::Update(UpdateOperation {
            table,
            sku_batch_id: SkuBatchId::new("sku-batch-id-5").unwrap(),
            assignments: vec![Assignment::new("is_deleted", FieldValue::Bool(true))],
        })
    }

    #[tokio::test]
    async fn in_memory_sink_keeps_order_across_calls() {
        let sink = InMemoryWriteSink::new();
        sink.apply(&[delete_update(InventoryTable::Inventory)]).await.unwrap();
        sink.apply(&[delete_update(InventoryTable::InventoryAggregate)]).await.unwrap();

        let tables: Vec<_> = sink.applied().iter().map(WriteOperation::table).collect();
        assert_eq!(
            tables,
            vec![InventoryTable::Inventory, InventoryTable::InventoryAggregate]
        );
    }

    #[tokio::test]
    async fn statement_log_sink_renders_sql() {
        let sink = StatementLogSink::new();
        sink.apply(&[
            delete_update(InventoryTable::Inventory),
            delete_update(InventoryTable::InventoryAggregate),
        ])
        .await
        .unwrap();

        assert_eq!(
            sink.statements(),
            vec![
                "update inventory set is_deleted = true where sku_batch_id = 'sku-batch-id-5'"
                    .to_string(),
                "update inventory_aggregate set is_deleted = true where sku_batch_id = 'sku-batch-id-5'"
                    .to_string(),
            ]
        );
    }
}
