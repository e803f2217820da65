use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use skusync_core::{Entity, FieldValue, SkuBatchId, SkuId, ValueObject, WarehouseId, WmsId};

use crate::operation::Assignment;

/// Storage column names for every SkuBatch field.
///
/// Domain field names are never case-converted on the fly; every column the
/// sink sees is listed here.
pub mod columns {
    pub const SKU_BATCH_ID: &str = "sku_batch_id";
    pub const SKU_ID: &str = "sku_id";
    pub const WMS_ID: &str = "wms_id";
    pub const QUANTITY_PER_UNIT_OF_MEASURE: &str = "quantity_per_unit_of_measure";
    pub const IS_ARCHIVED: &str = "is_archived";
    pub const IS_DELETED: &str = "is_deleted";
    pub const WAREHOUSE_ID: &str = "warehouse_id";
}

/// Quantity written for derived rows whose source has no unit-of-measure quantity.
pub const DEFAULT_QUANTITY_PER_UNIT_OF_MEASURE: i64 = 1;

/// A SkuBatch as seen by either dataset (application or inventory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuBatchRecord {
    pub sku_batch_id: SkuBatchId,
    #[serde(default)]
    pub sku_id: Option<SkuId>,
    #[serde(default)]
    pub wms_id: Option<WmsId>,
    #[serde(default)]
    pub quantity_per_unit_of_measure: Option<i64>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_archived: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_deleted: bool,
}

/// Exports write unset flags as `null`; read them as `false`.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl SkuBatchRecord {
    /// A record with only its identifier set (all optional fields empty, flags false).
    pub fn new(sku_batch_id: SkuBatchId) -> Self {
        Self {
            sku_batch_id,
            sku_id: None,
            wms_id: None,
            quantity_per_unit_of_measure: None,
            is_archived: false,
            is_deleted: false,
        }
    }

    pub fn with_sku_id(mut self, sku_id: SkuId) -> Self {
        self.sku_id = Some(sku_id);
        self
    }

    pub fn with_wms_id(mut self, wms_id: WmsId) -> Self {
        self.wms_id = Some(wms_id);
        self
    }

    pub fn with_quantity_per_unit_of_measure(mut self, quantity: i64) -> Self {
        self.quantity_per_unit_of_measure = Some(quantity);
        self
    }

    pub fn archived(mut self, is_archived: bool) -> Self {
        self.is_archived = is_archived;
        self
    }

    pub fn deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = is_deleted;
        self
    }
}

impl Entity for SkuBatchRecord {
    type Id = SkuBatchId;

    fn id(&self) -> &Self::Id {
        &self.sku_batch_id
    }
}

/// Comparable fields of a SkuBatch, in canonical order.
///
/// The identifier is deliberately absent: it is the join key, never an update.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkuBatchField {
    SkuId,
    WmsId,
    QuantityPerUnitOfMeasure,
    IsArchived,
    IsDeleted,
}

impl SkuBatchField {
    /// Declaration order; field updates are always reported in this order.
    pub const ALL: [SkuBatchField; 5] = [
        SkuBatchField::SkuId,
        SkuBatchField::WmsId,
        SkuBatchField::QuantityPerUnitOfMeasure,
        SkuBatchField::IsArchived,
        SkuBatchField::IsDeleted,
    ];

    /// Domain (camelCase) name of the field.
    pub fn name(self) -> &'static str {
        match self {
            SkuBatchField::SkuId => "skuId",
            SkuBatchField::WmsId => "wmsId",
            SkuBatchField::QuantityPerUnitOfMeasure => "quantityPerUnitOfMeasure",
            SkuBatchField::IsArchived => "isArchived",
            SkuBatchField::IsDeleted => "isDeleted",
        }
    }

    /// Storage column the field is written to.
    pub fn column(self) -> &'static str {
        match self {
            SkuBatchField::SkuId => columns::SKU_ID,
            SkuBatchField::WmsId => columns::WMS_ID,
            SkuBatchField::QuantityPerUnitOfMeasure => columns::QUANTITY_PER_UNIT_OF_MEASURE,
            SkuBatchField::IsArchived => columns::IS_ARCHIVED,
            SkuBatchField::IsDeleted => columns::IS_DELETED,
        }
    }

    /// Current value of this field on `record`.
    pub fn value_of(self, record: &SkuBatchRecord) -> FieldValue {
        match self {
            SkuBatchField::SkuId => record.sku_id.clone().map(String::from).into(),
            SkuBatchField::WmsId => record.wms_id.clone().map(String::from).into(),
            SkuBatchField::QuantityPerUnitOfMeasure => record.quantity_per_unit_of_measure.into(),
            SkuBatchField::IsArchived => record.is_archived.into(),
            SkuBatchField::IsDeleted => record.is_deleted.into(),
        }
    }
}

impl core::fmt::Display for SkuBatchField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Warehouse metadata (loaded independently of SkuBatch data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseMeta {
    pub warehouse_id: WarehouseId,
}

impl WarehouseMeta {
    pub fn new(warehouse_id: WarehouseId) -> Self {
        Self { warehouse_id }
    }
}

impl ValueObject for WarehouseMeta {}

/// Physical inventory row: one SkuBatch in one warehouse.
///
/// Only the write-operation builder creates these; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedInventoryRecord {
    sku_batch_id: SkuBatchId,
    sku_id: Option<SkuId>,
    wms_id: Option<WmsId>,
    quantity_per_unit_of_measure: i64,
    is_archived: bool,
    is_deleted: bool,
    warehouse_id: WarehouseId,
}

impl DerivedInventoryRecord {
    pub(crate) fn for_warehouse(record: &SkuBatchRecord, warehouse: &WarehouseMeta) -> Self {
        Self {
            sku_batch_id: record.sku_batch_id.clone(),
            sku_id: record.sku_id.clone(),
            wms_id: record.wms_id.clone(),
            quantity_per_unit_of_measure: record
                .quantity_per_unit_of_measure
                .unwrap_or(DEFAULT_QUANTITY_PER_UNIT_OF_MEASURE),
            is_archived: record.is_archived,
            is_deleted: record.is_deleted,
            warehouse_id: warehouse.warehouse_id.clone(),
        }
    }

    pub fn sku_batch_id(&self) -> &SkuBatchId {
        &self.sku_batch_id
    }

    pub fn sku_id(&self) -> Option<&SkuId> {
        self.sku_id.as_ref()
    }

    pub fn wms_id(&self) -> Option<&WmsId> {
        self.wms_id.as_ref()
    }

    pub fn quantity_per_unit_of_measure(&self) -> i64 {
        self.quantity_per_unit_of_measure
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    /// Every column of the row with its value, in insert order.
    pub fn assignments(&self) -> Vec<Assignment> {
        vec![
            Assignment::new(columns::SKU_BATCH_ID, self.sku_batch_id.as_str()),
            Assignment::new(
                columns::SKU_ID,
                self.sku_id.as_ref().map(SkuId::as_str),
            ),
            Assignment::new(
                columns::WMS_ID,
                self.wms_id.as_ref().map(WmsId::as_str),
            ),
            Assignment::new(
                columns::QUANTITY_PER_UNIT_OF_MEASURE,
                self.quantity_per_unit_of_measure,
            ),
            Assignment::new(columns::IS_ARCHIVED, self.is_archived),
            Assignment::new(columns::IS_DELETED, self.is_deleted),
            Assignment::new(columns::WAREHOUSE_ID, self.warehouse_id.as_str()),
        ]
    }
}

impl ValueObject for DerivedInventoryRecord {}

/// Index entities by id. The first occurrence of a duplicated id wins.
pub fn index_by_id<E: Entity>(entities: &[E]) -> HashMap<&E::Id, &E> {
    let mut index = HashMap::with_capacity(entities.len());
    for entity in entities {
        index.entry(entity.id()).or_insert(entity);
    }
    index
}
