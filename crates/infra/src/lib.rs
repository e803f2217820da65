//! Infrastructure layer: dataset sources, write sinks, remote transport,
//! configuration and the async sync runner.
//!
//! The reconciliation itself lives in `skusync-inventory`; everything here is
//! a thin, swappable adapter around it.

pub mod config;
pub mod postgres;
pub mod remote;
pub mod sink;
pub mod source;
pub mod sql;
pub mod sync;

pub use config::{ConfigError, DatabaseConfig, SyncConfig};
pub use postgres::PostgresWriteSink;
pub use remote::{RemoteInventoryClient, RemoteRecordKind, TransportError};
pub use sink::{InMemoryWriteSink, SinkError, StatementLogSink, WriteSink};
pub use source::{InMemoryDatasets, JsonFileDatasets, SkuBatchSource, SourceError, WarehouseSource};
pub use sync::{SyncError, SyncReport, SyncRunner};
