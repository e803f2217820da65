//! Postgres-backed write sink.
//!
//! Each operation becomes one parameterized statement. Values are always
//! bound, never interpolated; table and column names come from the declared
//! mappings in `skusync-inventory`.
//!
//! No transaction wraps the batch and nothing is retried: the first failing
//! statement aborts the run and is reported with its position.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, instrument};

use skusync_core::FieldValue;
use skusync_inventory::{
    DerivedInventoryRecord, InventoryTable, UpdateOperation, WriteOperation, columns,
};

use crate::config::DatabaseConfig;
use crate::sink::{SinkError, WriteSink};

pub struct PostgresWriteSink {
    pool: PgPool,
}

impl PostgresWriteSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, SinkError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| SinkError::Database(format!("connect: {e}")))?;
        Ok(Self::new(pool))
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Null => builder.push("null"),
        FieldValue::Bool(b) => builder.push_bind(*b),
        FieldValue::Integer(n) => builder.push_bind(*n),
        FieldValue::Text(s) => builder.push_bind(s.clone()),
    };
}

fn insert_query(record: &DerivedInventoryRecord) -> QueryBuilder<'static, Postgres> {
    let assignments = record.assignments();
    let mut builder = QueryBuilder::new("insert into ");
    builder.push(InventoryTable::Inventory.as_str()).push(" (");

    for (i, assignment) in assignments.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(assignment.column);
    }

    builder.push(") values (");
    for (i, assignment) in assignments.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, &assignment.value);
    }
    builder.push(")");

    builder
}

fn update_query(update: &UpdateOperation) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("update ");
    builder.push(update.table.as_str()).push(" set ");

    for (i, assignment) in update.assignments.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(assignment.column).push(" = ");
        push_value(&mut builder, &assignment.value);
    }

    builder
        .push(" where ")
        .push(columns::SKU_BATCH_ID)
        .push(" = ")
        .push_bind(update.sku_batch_id.to_string());

    builder
}

fn build_query(operation: &WriteOperation) -> QueryBuilder<'static, Postgres> {
    match operation {
        WriteOperation::Create(record) => insert_query(record),
        WriteOperation::Update(update) => update_query(update),
    }
}

#[async_trait]
impl WriteSink for PostgresWriteSink {
    #[instrument(skip_all, fields(operation_count = operations.len()))]
    async fn apply(&self, operations: &[WriteOperation]) -> Result<(), SinkError> {
        for (index, operation) in operations.iter().enumerate() {
            let mut builder = build_query(operation);
            if let Err(e) = builder.build().execute(&self.pool).await {
                error!(
                    index,
                    sku_batch_id = %operation.sku_batch_id(),
                    table = %operation.table(),
                    error = %e,
                    "failed to apply write operation"
                );
                return Err(SinkError::Operation {
                    index,
                    sku_batch_id: operation.sku_batch_id().to_string(),
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skusync_core::{SkuBatchId, SkuId, WarehouseId};
    use skusync_inventory::{Assignment, SkuBatchRecord, WarehouseMeta, fan_out};

    #[test]
    fn update_binds_values_as_parameters() {
        let update = UpdateOperation {
            table: InventoryTable::InventoryAggregate,
            sku_batch_id: SkuBatchId::new("sb'1").unwrap(),
            assignments: vec![
                Assignment::new("wms_id", FieldValue::Null),
                Assignment::new("sku_id", "sku'; drop table inventory; --"),
                Assignment::new("is_archived", true),
            ],
        };

        let builder = update_query(&update);
        assert_eq!(
            builder.sql(),
            "update inventory_aggregate set wms_id = null, sku_id = $1, is_archived = $2 \
             where sku_batch_id = $3"
        );
    }

    #[test]
    fn insert_lists_every_column_with_placeholders() {
        let record = SkuBatchRecord::new(SkuBatchId::new("sb-1").unwrap())
            .with_sku_id(SkuId::new("sku-1").unwrap());
        let warehouses = vec![WarehouseMeta::new(WarehouseId::new("W1").unwrap())];
        let derived = fan_out(&record, &warehouses).remove(0);

        let builder = build_query(&WriteOperation::Create(derived));
        assert_eq!(
            builder.sql(),
            "insert into inventory (sku_batch_id, sku_id, wms_id, quantity_per_unit_of_measure, \
             is_archived, is_deleted, warehouse_id) values ($1, $2, null, $3, $4, $5, $6)"
        );
    }
}
