//! Avro datum -> MutationEvent
//!
//! Decoding fails closed: a missing field, an unexpected Avro type, an
//! unknown enum name or trailing bytes are all [`CdcError::MalformedEvent`],
//! and an unregistered type id is [`CdcError::UnknownTypeId`]. Nothing is
//! returned until the whole event has been read.

use super::scan::check_lengths;
use super::schema::*;
use crate::common::{CdcError, CellValue, MutationEvent, MutationEventType, Result};
use apache_avro::from_avro_datum;
use apache_avro::types::Value;
use bytes::Bytes;
use sluice_schema::{ClusteringOrder, Column, ColumnKind, ColumnType, Table};
use std::io::Cursor;
use std::sync::Arc;

/// Decode a bare Avro datum
pub fn decode_datum(bytes: &[u8]) -> Result<MutationEvent> {
    check_lengths(bytes)?;

    let mut cursor = Cursor::new(bytes);
    let value = from_avro_datum(wire_schema(), &mut cursor, None)
        .map_err(|e| CdcError::malformed(e.to_string()))?;

    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(CdcError::malformed(format!(
            "{} trailing bytes after event",
            bytes.len() - consumed
        )));
    }

    event_from_value(value)
}

fn event_from_value(value: Value) -> Result<MutationEvent> {
    let mut record = Record::new(value, MUTATION_EVENT)?;

    let table = table_from_value(record.take(MUTATION_EVENT_TABLE)?)?;
    let ttl = nullable(record.take(MUTATION_EVENT_TTL)?)
        .map(|v| int(v, MUTATION_EVENT_TTL))
        .transpose()?;
    if let Some(ttl) = ttl.filter(|ttl| *ttl < 0) {
        return Err(CdcError::malformed(format!("negative ttl {}", ttl)));
    }
    let timestamp = nullable(record.take(MUTATION_EVENT_TIMESTAMP)?)
        .map(|v| long(v, MUTATION_EVENT_TIMESTAMP))
        .transpose()?;
    let mutation_type: MutationEventType =
        string(record.take(MUTATION_EVENT_TYPE)?, MUTATION_EVENT_TYPE)?.parse()?;
    let partition_keys = array(
        record.take(MUTATION_EVENT_PARTITION_KEYS)?,
        MUTATION_EVENT_PARTITION_KEYS,
    )?
    .into_iter()
    .map(cell_from_value)
    .collect::<Result<Vec<_>>>()?;

    Ok(MutationEvent {
        table: Arc::new(table),
        ttl,
        timestamp,
        mutation_type,
        partition_keys,
    })
}

fn table_from_value(value: Value) -> Result<Table> {
    let mut record = Record::new(value, TABLE)?;
    let keyspace = string(record.take(TABLE_KEYSPACE)?, TABLE_KEYSPACE)?;
    let name = string(record.take(TABLE_NAME)?, TABLE_NAME)?;
    let columns = array(record.take(TABLE_COLUMNS)?, TABLE_COLUMNS)?
        .into_iter()
        .map(column_from_value)
        .collect::<Result<Vec<_>>>()?;

    Table::new(keyspace, name, columns).map_err(|e| CdcError::malformed(e.to_string()))
}

fn column_from_value(value: Value) -> Result<Column> {
    let mut record = Record::new(value, COLUMN)?;
    let name = string(record.take(COLUMN_NAME)?, COLUMN_NAME)?;

    let order = nullable(record.take(COLUMN_ORDER)?)
        .map(|v| string(v, COLUMN_ORDER))
        .transpose()?
        .map(|s| s.parse::<ClusteringOrder>())
        .transpose()
        .map_err(|e| CdcError::malformed(e.to_string()))?;

    let kind = nullable(record.take(COLUMN_KIND)?)
        .map(|v| string(v, COLUMN_KIND))
        .transpose()?
        .map(|s| s.parse::<ColumnKind>())
        .transpose()
        .map_err(|e| CdcError::malformed(e.to_string()))?
        .unwrap_or_default();

    let column_type = nullable(record.take(COLUMN_TYPE_ID)?)
        .map(|v| int(v, COLUMN_TYPE_ID))
        .transpose()?
        .map(ColumnType::from_id)
        .transpose()?;

    let mut column = Column::new(name, kind).map_err(|e| CdcError::malformed(e.to_string()))?;
    if let Some(column_type) = column_type {
        column = column.with_type(column_type);
    }
    if let Some(order) = order {
        column = column.with_order(order);
    }
    Ok(column)
}

fn cell_from_value(value: Value) -> Result<CellValue> {
    let mut record = Record::new(value, CELL_VALUE)?;
    let column = column_from_value(record.take(CELL_VALUE_COLUMN)?)?;
    let value = match record.take(CELL_VALUE_VALUE)? {
        Value::Bytes(b) => Bytes::from(b),
        other => return Err(unexpected(CELL_VALUE_VALUE, "bytes", &other)),
    };
    Ok(CellValue { column, value })
}

/// Fields of a decoded record, taken out by name
struct Record {
    name: &'static str,
    fields: Vec<(String, Value)>,
}

impl Record {
    fn new(value: Value, name: &'static str) -> Result<Self> {
        match value {
            Value::Record(fields) => Ok(Self { name, fields }),
            other => Err(unexpected(name, "record", &other)),
        }
    }

    fn take(&mut self, field: &str) -> Result<Value> {
        let position = self
            .fields
            .iter()
            .position(|(n, _)| n == field)
            .ok_or_else(|| {
                CdcError::malformed(format!("{} is missing field '{}'", self.name, field))
            })?;
        Ok(self.fields.swap_remove(position).1)
    }
}

fn nullable(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Union(_, inner) => match *inner {
            Value::Null => None,
            v => Some(v),
        },
        v => Some(v),
    }
}

fn string(value: Value, field: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(unexpected(field, "string", &other)),
    }
}

fn int(value: Value, field: &str) -> Result<i32> {
    match value {
        Value::Int(v) => Ok(v),
        other => Err(unexpected(field, "int", &other)),
    }
}

fn long(value: Value, field: &str) -> Result<i64> {
    match value {
        Value::Long(v) => Ok(v),
        other => Err(unexpected(field, "long", &other)),
    }
}

fn array(value: Value, field: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(unexpected(field, "array", &other)),
    }
}

fn unexpected(field: &str, expected: &str, actual: &Value) -> CdcError {
    CdcError::malformed(format!(
        "field '{}': expected {}, got {:?}",
        field, expected, actual
    ))
}
