//! Dataset providers for the reconciliation.
//!
//! Providers hand over fully materialized collections; the engine never sees
//! cursors, pages or connections.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use skusync_core::SkuBatchId;
use skusync_inventory::{SkuBatchRecord, WarehouseMeta};

use crate::config::SyncConfig;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Provider of both SkuBatch datasets.
#[async_trait]
pub trait SkuBatchSource: Send + Sync {
    /// Authoritative SkuBatch records from the application database.
    async fn app_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError>;

    /// Ids of every SkuBatch already present in inventory.
    async fn inventory_sku_batch_ids(&self) -> Result<Vec<SkuBatchId>, SourceError>;

    /// SkuBatch records as currently stored in inventory.
    async fn inventory_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError>;
}

/// Provider of the warehouse list (static for one run).
#[async_trait]
pub trait WarehouseSource: Send + Sync {
    async fn warehouses(&self) -> Result<Vec<WarehouseMeta>, SourceError>;
}

/// In-memory datasets for tests/dev.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasets {
    app: Vec<SkuBatchRecord>,
    inventory_ids: Vec<SkuBatchId>,
    inventory: Vec<SkuBatchRecord>,
    warehouses: Vec<WarehouseMeta>,
}

impl InMemoryDatasets {
    /// The inventory id list is derived from `inventory`.
    pub fn new(
        app: Vec<SkuBatchRecord>,
        inventory: Vec<SkuBatchRecord>,
        warehouses: Vec<WarehouseMeta>,
    ) -> Self {
        let inventory_ids = inventory.iter().map(|r| r.sku_batch_id.clone()).collect();
        Self {
            app,
            inventory_ids,
            inventory,
            warehouses,
        }
    }

    /// Override the inventory id list (e.g. to simulate a lagging id query).
    pub fn with_inventory_ids(mut self, inventory_ids: Vec<SkuBatchId>) -> Self {
        self.inventory_ids = inventory_ids;
        self
    }
}

#[async_trait]
impl SkuBatchSource for InMemoryDatasets {
    async fn app_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError> {
        Ok(self.app.clone())
    }

    async fn inventory_sku_batch_ids(&self) -> Result<Vec<SkuBatchId>, SourceError> {
        Ok(self.inventory_ids.clone())
    }

    async fn inventory_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError> {
        Ok(self.inventory.clone())
    }
}

#[async_trait]
impl WarehouseSource for InMemoryDatasets {
    async fn warehouses(&self) -> Result<Vec<WarehouseMeta>, SourceError> {
        Ok(self.warehouses.clone())
    }
}

/// Datasets exported as JSON arrays (camelCase records).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileDatasets {
    app_path: PathBuf,
    inventory_path: PathBuf,
    warehouses_path: PathBuf,
}

impl JsonFileDatasets {
    pub fn new(
        app_path: impl Into<PathBuf>,
        inventory_path: impl Into<PathBuf>,
        warehouses_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            app_path: app_path.into(),
            inventory_path: inventory_path.into(),
            warehouses_path: warehouses_path.into(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            &config.app_sku_batches_path,
            &config.inventory_sku_batches_path,
            &config.warehouses_path,
        )
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl SkuBatchSource for JsonFileDatasets {
    async fn app_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError> {
        read_json(&self.app_path).await
    }

    async fn inventory_sku_batch_ids(&self) -> Result<Vec<SkuBatchId>, SourceError> {
        let records: Vec<SkuBatchRecord> = read_json(&self.inventory_path).await?;
        Ok(records.into_iter().map(|r| r.sku_batch_id).collect())
    }

    async fn inventory_sku_batches(&self) -> Result<Vec<SkuBatchRecord>, SourceError> {
        read_json(&self.inventory_path).await
    }
}

#[async_trait]
impl WarehouseSource for JsonFileDatasets {
    async fn warehouses(&self) -> Result<Vec<WarehouseMeta>, SourceError> {
        read_json(&self.warehouses_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_datasets_from_json_files() {
        let app = json_file(
            r#"[{"skuBatchId":"sb-1","skuId":"sku-1","quantityPerUnitOfMeasure":25},
                {"skuBatchId":"sb-2","skuId":"sku-1","isArchived":true}]"#,
        );
        let inventory = json_file(r#"[{"skuBatchId":"sb-1","skuId":"sku-1"}]"#);
        let warehouses = json_file(r#"[{"warehouseId":"W1"},{"warehouseId":"W2"}]"#);

        let datasets = JsonFileDatasets::new(app.path(), inventory.path(), warehouses.path());

        let app_records = datasets.app_sku_batches().await.unwrap();
        assert_eq!(app_records.len(), 2);
        assert!(app_records[1].is_archived);

        let ids = datasets.inventory_sku_batch_ids().await.unwrap();
        assert_eq!(ids, vec![SkuBatchId::new("sb-1").unwrap()]);

        let warehouses = datasets.warehouses().await.unwrap();
        assert_eq!(warehouses.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let datasets = JsonFileDatasets::new("/nonexistent/app.json", "/nonexistent/inv.json", "/nonexistent/wh.json");

        match datasets.app_sku_batches().await.unwrap_err() {
            SourceError::Io { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/app.json")),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_records_are_parse_errors() {
        let warehouses = json_file(r#"[{"warehouseId":""}]"#);
        let datasets = JsonFileDatasets::new("unused", "unused", warehouses.path());

        let err = datasets.warehouses().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[tokio::test]
    async fn in_memory_ids_can_be_overridden() {
        let datasets = InMemoryDatasets::new(
            Vec::new(),
            vec![SkuBatchRecord::new(SkuBatchId::new("a").unwrap())],
            Vec::new(),
        )
        .with_inventory_ids(Vec::new());

        assert!(datasets.inventory_sku_batch_ids().await.unwrap().is_empty());
        assert_eq!(datasets.inventory_sku_batches().await.unwrap().len(), 1);
    }
}
