//! Shared building blocks for the SkuBatch sync.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{SkuBatchId, SkuId, WarehouseId, WmsId};
pub use value::FieldValue;
pub use value_object::ValueObject;
