//! The mutation event wire schema
//!
//! Optional fields are `["null", T]` unions defaulting to `null`, so a
//! reader can tell "TTL not set" from "TTL = 0". Enumerations travel as
//! their canonical name strings. New fields must be appended with a
//! default, and enum names and type ids are never reused.

use apache_avro::Schema;
use std::sync::LazyLock;

pub const MUTATION_EVENT: &str = "MutationEvent";
pub const MUTATION_EVENT_TABLE: &str = "table";
pub const MUTATION_EVENT_TTL: &str = "ttl";
pub const MUTATION_EVENT_TIMESTAMP: &str = "timestamp";
pub const MUTATION_EVENT_TYPE: &str = "type";
pub const MUTATION_EVENT_PARTITION_KEYS: &str = "partitionKeys";

pub const TABLE: &str = "Table";
pub const TABLE_KEYSPACE: &str = "keyspace";
pub const TABLE_NAME: &str = "name";
pub const TABLE_COLUMNS: &str = "columns";

pub const COLUMN: &str = "Column";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_ORDER: &str = "order";
pub const COLUMN_KIND: &str = "kind";
pub const COLUMN_TYPE_ID: &str = "typeId";

pub const CELL_VALUE: &str = "CellValue";
pub const CELL_VALUE_COLUMN: &str = "column";
pub const CELL_VALUE_VALUE: &str = "value";

/// Avro schema (JSON) of an encoded mutation event
pub const WIRE_SCHEMA_JSON: &str = r#"{
  "type": "record",
  "name": "MutationEvent",
  "namespace": "io.sluice.cdc",
  "fields": [
    {
      "name": "table",
      "type": {
        "type": "record",
        "name": "Table",
        "fields": [
          {"name": "keyspace", "type": "string"},
          {"name": "name", "type": "string"},
          {
            "name": "columns",
            "type": {
              "type": "array",
              "items": {
                "type": "record",
                "name": "Column",
                "fields": [
                  {"name": "name", "type": "string"},
                  {"name": "order", "type": ["null", "string"], "default": null},
                  {"name": "kind", "type": ["null", "string"], "default": null},
                  {"name": "typeId", "type": ["null", "int"], "default": null}
                ]
              }
            }
          }
        ]
      }
    },
    {"name": "ttl", "type": ["null", "int"], "default": null},
    {"name": "timestamp", "type": ["null", "long"], "default": null},
    {"name": "type", "type": "string"},
    {
      "name": "partitionKeys",
      "type": {
        "type": "array",
        "items": {
          "type": "record",
          "name": "CellValue",
          "fields": [
            {"name": "column", "type": "Column"},
            {"name": "value", "type": "bytes"}
          ]
        }
      }
    }
  ]
}"#;

static WIRE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::parse_str(WIRE_SCHEMA_JSON).expect("wire schema literal is valid Avro")
});

/// The parsed wire schema
pub fn wire_schema() -> &'static Schema {
    &WIRE_SCHEMA
}
