//! SQL text rendering of write operations.
//!
//! Used for dry runs and statement logs. Values are quoted and escaped here;
//! identifiers come from the declared column table and [`InventoryTable`],
//! never from data. The Postgres sink binds parameters instead of using this.

use skusync_core::FieldValue;
use skusync_inventory::{
    Assignment, DerivedInventoryRecord, InventoryTable, UpdateOperation, WriteOperation, columns,
};

/// Render a scalar as a SQL literal.
pub fn format_sql_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Integer(n) => n.to_string(),
        FieldValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

pub fn render_insert(record: &DerivedInventoryRecord) -> String {
    let assignments = record.assignments();
    let columns: Vec<&str> = assignments.iter().map(|a| a.column).collect();
    let values: Vec<String> = assignments.iter().map(|a| format_sql_value(&a.value)).collect();

    format!(
        "insert into {} ({}) values ({})",
        InventoryTable::Inventory,
        columns.join(", "),
        values.join(", ")
    )
}

pub fn render_update(update: &UpdateOperation) -> String {
    format!(
        "update {} set {} where {} = {}",
        update.table,
        render_assignments(&update.assignments),
        columns::SKU_BATCH_ID,
        format_sql_value(&FieldValue::Text(update.sku_batch_id.to_string()))
    )
}

fn render_assignments(assignments: &[Assignment]) -> String {
    assignments
        .iter()
        .map(|a| format!("{} = {}", a.column, format_sql_value(&a.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render(operation: &WriteOperation) -> String {
    match operation {
        WriteOperation::Create(record) => render_insert(record),
        WriteOperation::Update(update) => render_update(update),
    }
}
