//! MutationEvent -> Avro datum

use super::schema::*;
use crate::common::{CdcError, CellValue, MutationEvent, Result};
use apache_avro::types::Value;
use apache_avro::to_avro_datum;
use sluice_schema::{Column, Table};

/// Encode an event as a bare Avro datum
///
/// A negative TTL is refused with [`CdcError::InvalidMutation`], the same
/// rule the builder applies, since decoders reject it.
pub fn encode_datum(event: &MutationEvent) -> Result<Vec<u8>> {
    if let Some(ttl) = event.ttl.filter(|ttl| *ttl < 0) {
        return Err(CdcError::invalid_mutation(format!(
            "negative ttl {} on event for {}",
            ttl, event.table
        )));
    }

    to_avro_datum(wire_schema(), event_value(event)).map_err(|e| {
        CdcError::serialization(format!("failed to encode event for {}: {}", event.table, e))
    })
}

fn event_value(event: &MutationEvent) -> Value {
    Value::Record(vec![
        (MUTATION_EVENT_TABLE.to_string(), table_value(&event.table)),
        (
            MUTATION_EVENT_TTL.to_string(),
            nullable(event.ttl.map(Value::Int)),
        ),
        (
            MUTATION_EVENT_TIMESTAMP.to_string(),
            nullable(event.timestamp.map(Value::Long)),
        ),
        (
            MUTATION_EVENT_TYPE.to_string(),
            Value::String(event.mutation_type.as_str().to_string()),
        ),
        (
            MUTATION_EVENT_PARTITION_KEYS.to_string(),
            Value::Array(event.partition_keys.iter().map(cell_value).collect()),
        ),
    ])
}

fn table_value(table: &Table) -> Value {
    Value::Record(vec![
        (
            TABLE_KEYSPACE.to_string(),
            Value::String(table.keyspace().to_string()),
        ),
        (TABLE_NAME.to_string(), Value::String(table.name().to_string())),
        (
            TABLE_COLUMNS.to_string(),
            Value::Array(table.columns().iter().map(column_value).collect()),
        ),
    ])
}

fn column_value(column: &Column) -> Value {
    Value::Record(vec![
        (COLUMN_NAME.to_string(), Value::String(column.name().to_string())),
        (
            COLUMN_ORDER.to_string(),
            nullable(column.order().map(|o| Value::String(o.as_str().to_string()))),
        ),
        (
            COLUMN_KIND.to_string(),
            nullable(Some(Value::String(column.kind().as_str().to_string()))),
        ),
        (
            COLUMN_TYPE_ID.to_string(),
            nullable(column.column_type().map(|t| Value::Int(t.id()))),
        ),
    ])
}

fn cell_value(cell: &CellValue) -> Value {
    Value::Record(vec![
        (CELL_VALUE_COLUMN.to_string(), column_value(&cell.column)),
        (CELL_VALUE_VALUE.to_string(), Value::Bytes(cell.value.to_vec())),
    ])
}

// Branch 0 of every optional field is "null".
fn nullable(value: Option<Value>) -> Value {
    match value {
        Some(v) => Value::Union(1, Box::new(v)),
        None => Value::Union(0, Box::new(Value::Null)),
    }
}
