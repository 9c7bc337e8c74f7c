//! End-to-end tests: mutation -> event -> bytes -> event

mod common;

use apache_avro::to_avro_datum;
use apache_avro::types::Value;
use common::{composite_key_table, keyed_mutation, mixed_table, typed};
use sluice_cdc::avro::wire_schema;
use sluice_cdc::common::{HEADER_LEN, MAGIC_BYTE, WIRE_SCHEMA_ID};
use sluice_cdc::{
    build_event, decode, encode, serialize_mutation, BoundMutation, CdcError, MutationEvent,
    MutationEventSerializer, MutationEventType, QueryKind, RowsImpacted, SerializationConfig,
};
use sluice_schema::{ClusteringOrder, Codec, ColumnKind, ColumnType, CqlCodec, CqlValue, Table};
use std::sync::Arc;

fn roundtrip(mutation: &BoundMutation) -> MutationEvent {
    let bytes = serialize_mutation(mutation).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, build_event(mutation).unwrap());
    decoded
}

#[test]
fn test_table_schema_survives() {
    let table = mixed_table();
    let mutation = BoundMutation::new(QueryKind::Update, table.clone(), RowsImpacted::All);
    let event = roundtrip(&mutation);

    assert_eq!(event.table.keyspace(), "ks_1");
    assert_eq!(event.table.name(), "table_1");

    let names: Vec<_> = event.table.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["pk_1", "col_1", "col_2", "col_3"]);

    let type_ids: Vec<_> = event
        .table
        .columns()
        .iter()
        .map(|c| c.column_type().map(|t| t.id()))
        .collect();
    assert_eq!(type_ids, [Some(1), Some(9), None, Some(5)]);

    let kinds: Vec<_> = event.table.columns().iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        [
            ColumnKind::PartitionKey,
            ColumnKind::Regular,
            ColumnKind::Regular,
            ColumnKind::Regular
        ]
    );

    let orders: Vec<_> = event.table.columns().iter().map(|c| c.order()).collect();
    assert_eq!(orders, [Some(ClusteringOrder::Asc), None, None, None]);
}

#[test]
fn test_ttl_and_timestamp() {
    let table = mixed_table();
    let mutation = BoundMutation::new(QueryKind::Update, table, RowsImpacted::All)
        .with_ttl(100)
        .with_timestamp(10000);
    let event = roundtrip(&mutation);
    assert_eq!(event.ttl, Some(100));
    assert_eq!(event.timestamp, Some(10000));
}

#[test]
fn test_absent_ttl_and_timestamp() {
    let table = mixed_table();
    let event = roundtrip(&BoundMutation::new(QueryKind::Update, table, RowsImpacted::All));
    assert_eq!(event.ttl, None);
    assert_eq!(event.timestamp, None);
}

#[test]
fn test_zero_is_not_absent() {
    let table = mixed_table();
    let mutation = BoundMutation::new(QueryKind::Update, table, RowsImpacted::All)
        .with_ttl(0)
        .with_timestamp(0);
    let event = roundtrip(&mutation);
    assert_eq!(event.ttl, Some(0));
    assert_eq!(event.timestamp, Some(0));
}

#[test]
fn test_mutation_types() {
    let table = mixed_table();
    let cases = [
        (QueryKind::Update, MutationEventType::Update),
        (QueryKind::Delete, MutationEventType::Delete),
        (QueryKind::Insert, MutationEventType::Update),
    ];
    for (kind, expected) in cases {
        let event = roundtrip(&BoundMutation::new(kind, table.clone(), RowsImpacted::All));
        assert_eq!(event.mutation_type, expected, "{}", kind);
    }
}

#[test]
fn test_partition_keys() {
    let table = composite_key_table();
    let mutation = keyed_mutation(
        QueryKind::Insert,
        &table,
        vec![
            typed(&table, "pk_1", 1),
            typed(&table, "pk_2", true),
            typed(&table, "ck_1", "a"),
        ],
    );
    let event = roundtrip(&mutation);

    assert_eq!(event.partition_keys.len(), 2);
    let decoded: Vec<_> = event
        .partition_keys
        .iter()
        .map(|cell| {
            let column_type = cell.column.column_type().unwrap();
            (cell.column.name(), CqlCodec.decode(column_type, &cell.value).unwrap())
        })
        .collect();
    assert_eq!(
        decoded,
        [("pk_1", CqlValue::Int(1)), ("pk_2", CqlValue::Boolean(true))]
    );
}

#[test]
fn test_only_first_key_is_carried() {
    let table = composite_key_table();
    let first = keyed_mutation(
        QueryKind::Delete,
        &table,
        vec![typed(&table, "pk_1", 1), typed(&table, "pk_2", true)],
    );
    let second = keyed_mutation(
        QueryKind::Delete,
        &table,
        vec![typed(&table, "pk_1", 2), typed(&table, "pk_2", false)],
    );
    let keys = [first.rows_impacted.keys(), second.rows_impacted.keys()].concat();
    let mutation = BoundMutation::new(QueryKind::Delete, table, RowsImpacted::Keys(keys));

    let event = roundtrip(&mutation);
    assert_eq!(event.partition_keys, build_event(&first).unwrap().partition_keys);
}

#[test]
fn test_empty_table() {
    let table = Arc::new(Table::new("ks_1", "table_1", Vec::new()).unwrap());
    let event = roundtrip(&BoundMutation::new(QueryKind::Delete, table, RowsImpacted::All));
    assert!(event.table.columns().is_empty());
    assert!(event.partition_keys.is_empty());
}

#[test]
fn test_wire_header() {
    let table = mixed_table();
    let bytes = serialize_mutation(&BoundMutation::new(QueryKind::Update, table, RowsImpacted::All))
        .unwrap();
    assert_eq!(bytes[0], MAGIC_BYTE);
    assert_eq!(&bytes[1..HEADER_LEN], &WIRE_SCHEMA_ID.to_be_bytes());
}

#[test]
fn test_bare_serializer() {
    let serializer = MutationEventSerializer::new(SerializationConfig::bare());
    let table = composite_key_table();
    let mutation = keyed_mutation(
        QueryKind::Update,
        &table,
        vec![typed(&table, "pk_1", 7), typed(&table, "pk_2", false)],
    );

    let bytes = serializer.serialize_mutation(&mutation).unwrap();
    assert_eq!(bytes.len() + HEADER_LEN, serialize_mutation(&mutation).unwrap().len());
    assert_eq!(serializer.decode(&bytes).unwrap(), build_event(&mutation).unwrap());
}

#[test]
fn test_wrong_magic_byte() {
    let table = mixed_table();
    let mutation = BoundMutation::new(QueryKind::Update, table, RowsImpacted::All);
    let event = build_event(&mutation).unwrap();
    let mut bytes = encode(&event).unwrap().to_vec();
    bytes[0] = 0x01;
    assert!(matches!(decode(&bytes), Err(CdcError::MalformedEvent(_))));
}

#[test]
fn test_wrong_schema_id() {
    let table = mixed_table();
    let mutation = BoundMutation::new(QueryKind::Update, table, RowsImpacted::All);
    let event = build_event(&mutation).unwrap();
    let mut bytes = encode(&event).unwrap().to_vec();
    bytes[4] = 2;
    assert!(matches!(decode(&bytes), Err(CdcError::MalformedEvent(_))));
}

#[test]
fn test_truncated_input() {
    let table = composite_key_table();
    let mutation = keyed_mutation(
        QueryKind::Update,
        &table,
        vec![typed(&table, "pk_1", 1), typed(&table, "pk_2", true)],
    )
    .with_ttl(60);
    let bytes = serialize_mutation(&mutation).unwrap();

    for len in 0..bytes.len() {
        match decode(&bytes[..len]) {
            Err(CdcError::MalformedEvent(_)) => {}
            other => panic!("prefix of length {} gave {:?}", len, other),
        }
    }
}

#[test]
fn test_unknown_type_id() {
    let column = Value::Record(vec![
        ("name".into(), Value::String("c".into())),
        ("order".into(), Value::Union(0, Box::new(Value::Null))),
        (
            "kind".into(),
            Value::Union(1, Box::new(Value::String("Regular".into()))),
        ),
        ("typeId".into(), Value::Union(1, Box::new(Value::Int(99)))),
    ]);
    let event = Value::Record(vec![
        (
            "table".into(),
            Value::Record(vec![
                ("keyspace".into(), Value::String("ks_1".into())),
                ("name".into(), Value::String("table_1".into())),
                ("columns".into(), Value::Array(vec![column])),
            ]),
        ),
        ("ttl".into(), Value::Union(0, Box::new(Value::Null))),
        ("timestamp".into(), Value::Union(0, Box::new(Value::Null))),
        ("type".into(), Value::String("UPDATE".into())),
        ("partitionKeys".into(), Value::Array(Vec::new())),
    ]);
    let datum = to_avro_datum(wire_schema(), event).unwrap();

    let mut bytes = vec![MAGIC_BYTE];
    bytes.extend_from_slice(&WIRE_SCHEMA_ID.to_be_bytes());
    bytes.extend_from_slice(&datum);

    assert_eq!(decode(&bytes), Err(CdcError::UnknownTypeId(99)));
}

#[test]
fn test_codec_swap_and_type_mismatch() {
    let table = composite_key_table();
    let text_value = sluice_schema::TypedValue::for_native(
        Arc::new(sluice_schema::TextCodec),
        table.column("pk_1").unwrap().clone(),
        ColumnType::Int,
        &CqlValue::Int(1),
    )
    .unwrap();
    // Same declared type, different codec: accepted, bytes are the text form
    let mutation = keyed_mutation(QueryKind::Update, &table, vec![text_value]);
    let event = roundtrip(&mutation);
    assert_eq!(&event.partition_keys[0].value[..], b"1");

    // Declared type disagrees with the column
    let wrong = sluice_schema::TypedValue::for_native(
        Arc::new(CqlCodec),
        table.column("pk_1").unwrap().clone(),
        ColumnType::Bigint,
        &CqlValue::Bigint(1),
    );
    assert!(wrong.is_err());
}

#[test]
fn test_oversized_block_count_fails_cleanly() {
    // framed event with empty keyspace and name, then a column count of
    // 500 million in twelve bytes total
    let mut bytes = vec![MAGIC_BYTE];
    bytes.extend_from_slice(&WIRE_SCHEMA_ID.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x00, 0x80, 0x94, 0xeb, 0xdc, 0x03]);
    assert_eq!(bytes.len(), 12);

    assert!(matches!(decode(&bytes), Err(CdcError::MalformedEvent(_))));
}

#[test]
fn test_large_event_encodes() {
    let table = Arc::new(
        Table::new(
            "ks",
            "t",
            vec![
                sluice_schema::Column::typed("pk", ColumnKind::PartitionKey, ColumnType::Blob)
                    .unwrap(),
            ],
        )
        .unwrap(),
    );
    let blob = vec![0xab; 17 * 1024 * 1024];
    let mutation = keyed_mutation(
        QueryKind::Update,
        &table,
        vec![typed(&table, "pk", CqlValue::Blob(blob.into()))],
    );

    let bytes = serialize_mutation(&mutation).unwrap();
    assert!(bytes.len() > SerializationConfig::default().max_event_size);

    let roomy = MutationEventSerializer::new(
        SerializationConfig::default().with_max_event_size(32 * 1024 * 1024),
    );
    assert_eq!(roomy.decode(&bytes).unwrap(), build_event(&mutation).unwrap());
}

#[test]
fn test_negative_ttl_not_encoded() {
    let table = mixed_table();
    let mutation = BoundMutation::new(QueryKind::Update, table, RowsImpacted::All);
    let mut event = build_event(&mutation).unwrap();
    event.ttl = Some(-1);
    assert!(matches!(encode(&event), Err(CdcError::InvalidMutation(_))));
}
