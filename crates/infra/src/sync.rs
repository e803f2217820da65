//! End-to-end sync: load datasets, reconcile, apply.
//!
//! The runner is the only place that awaits I/O. Provider and sink failures
//! are logged and propagated; per-record anomalies stay inside the plan.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use skusync_inventory::{ReconciliationInput, ReconciliationPlan, reconcile};

use crate::sink::{SinkError, WriteSink};
use crate::source::{SkuBatchSource, SourceError, WarehouseSource};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to load datasets: {0}")]
    Source(#[from] SourceError),
    #[error("failed to apply write operations: {0}")]
    Sink(#[from] SinkError),
}

/// Outcome of one completed sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub create_count: usize,
    pub update_count: usize,
    pub skipped_count: usize,
    pub unmatched_count: usize,
}

pub struct SyncRunner<S, W, K> {
    source: S,
    warehouses: W,
    sink: K,
}

impl<S, W, K> SyncRunner<S, W, K>
where
    S: SkuBatchSource,
    W: WarehouseSource,
    K: WriteSink,
{
    pub fn new(source: S, warehouses: W, sink: K) -> Self {
        Self {
            source,
            warehouses,
            sink,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Load every dataset and build the plan without applying it.
    pub async fn plan(&self) -> Result<ReconciliationPlan, SyncError> {
        let app_records = self.source.app_sku_batches().await.inspect_err(|e| {
            error!(error = %e, "error querying app database for skuBatch records");
        })?;
        let inventory_ids = self.source.inventory_sku_batch_ids().await.inspect_err(|e| {
            error!(error = %e, "error querying inventory database for skuBatchIds");
        })?;
        let inventory_records = self.source.inventory_sku_batches().await.inspect_err(|e| {
            error!(error = %e, "error querying inventory database for skuBatch records");
        })?;
        let warehouses = self.warehouses.warehouses().await.inspect_err(|e| {
            error!(error = %e, "error querying warehouses");
        })?;

        info!(
            app_count = app_records.len(),
            inventory_count = inventory_records.len(),
            warehouse_count = warehouses.len(),
            "datasets loaded"
        );

        Ok(reconcile(&ReconciliationInput {
            app_records: &app_records,
            inventory_ids: &inventory_ids,
            inventory_records: &inventory_records,
            warehouses: &warehouses,
        }))
    }

    /// Run a full sync: plan, then hand every operation to the sink in order.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let run_id = Uuid::now_v7();
        let span = info_span!("sku_batch_sync", %run_id);

        async move {
            let started_at = Utc::now();
            info!("syncing skuBatch data from app to inventory");

            let plan = self.plan().await?;
            self.sink.apply(&plan.operations).await.inspect_err(|e| {
                error!(error = %e, "error syncing skuBatch data");
            })?;

            let report = SyncReport {
                run_id,
                started_at,
                completed_at: Utc::now(),
                create_count: plan.create_count,
                update_count: plan.update_count,
                skipped_count: plan.skipped_count,
                unmatched_count: plan.unmatched.len(),
            };
            info!(
                create_count = report.create_count,
                update_count = report.update_count,
                "done updating inventory from app db"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skusync_core::{SkuBatchId, SkuId, WarehouseId};
    use skusync_inventory::{SkuBatchRecord, WarehouseMeta, WriteOperation};

    use crate::sink::{InMemoryWriteSink, StatementLogSink};
    use crate::source::InMemoryDatasets;

    fn sku_batch(raw: &str) -> SkuBatchRecord {
        SkuBatchRecord::new(SkuBatchId::new(raw).unwrap())
            .with_sku_id(SkuId::new("sku-1").unwrap())
            .with_quantity_per_unit_of_measure(1)
    }

    fn datasets() -> InMemoryDatasets {
        let inventory: Vec<SkuBatchRecord> =
            (1..=4).map(|i| sku_batch(&format!("sku-batch-id-{i}"))).collect();
        let mut app = inventory.clone();
        app[0] = app[0].clone().deleted(true);
        app.push(sku_batch("sku-batch-id-5"));

        let warehouses = vec![
            WarehouseMeta::new(WarehouseId::new("W1").unwrap()),
            WarehouseMeta::new(WarehouseId::new("W2").unwrap()),
        ];
        InMemoryDatasets::new(app, inventory, warehouses)
    }

    struct FailingSource;

    #[async_trait]
    impl SkuBatchSource for FailingSource {
        async fn app_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError> {
            Err(SourceError::Unavailable("app database down".to_string()))
        }

        async fn inventory_sku_batch_ids(&self) -> Result<Vec<SkuBatchId>, SourceError> {
            Ok(Vec::new())
        }

        async fn inventory_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError> {
            Ok(Vec::new())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl WriteSink for FailingSink {
        async fn apply(&self, _operations: &[WriteOperation]) -> Result<(), SinkError> {
            Err(SinkError::Database("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn applies_creates_then_updates() {
        let data = datasets();
        let runner = SyncRunner::new(data.clone(), data, InMemoryWriteSink::new());

        let report = runner.run().await.unwrap();
        assert_eq!(report.create_count, 2);
        assert_eq!(report.update_count, 2);
        assert_eq!(report.skipped_count, 0);
        assert_eq!(report.unmatched_count, 0);

        let applied = runner.sink().applied();
        assert_eq!(applied.len(), 4);
        assert!(applied[..2].iter().all(WriteOperation::is_create));
        assert!(applied[2..].iter().all(WriteOperation::is_update));
    }

    #[tokio::test]
    async fn dry_run_renders_statements() {
        let data = datasets();
        let runner = SyncRunner::new(data.clone(), data, StatementLogSink::new());

        runner.run().await.unwrap();
        let statements = runner.sink().statements();
        assert_eq!(statements.len(), 4);
        assert!(statements[0].starts_with("insert into inventory ("));
        assert_eq!(
            statements[3],
            "update inventory_aggregate set is_deleted = true where sku_batch_id = 'sku-batch-id-1'"
        );
    }

    #[tokio::test]
    async fn source_failure_aborts_before_writing() {
        let runner = SyncRunner::new(FailingSource, datasets(), InMemoryWriteSink::new());

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, SyncError::Source(SourceError::Unavailable(_))));
        assert!(runner.sink().applied().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_is_propagated() {
        let data = datasets();
        let runner = SyncRunner::new(data.clone(), data, FailingSink);

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, SyncError::Sink(SinkError::Database(_))));
    }

    #[tokio::test]
    async fn rerunning_on_unchanged_inputs_plans_the_same_operations() {
        let data = datasets();
        let runner = SyncRunner::new(data.clone(), data, InMemoryWriteSink::new());

        let first = runner.plan().await.unwrap();
        let second = runner.plan().await.unwrap();
        assert_eq!(first, second);
    }
}
