//! Property tests for the event codec
//!
//! Events are generated directly, without going through a mutation, so
//! every field combination the wire format allows gets exercised.

use proptest::prelude::*;
use sluice_cdc::{
    decode, encode, CellValue, MutationEvent, MutationEventSerializer, MutationEventType,
    SerializationConfig,
};
use sluice_schema::{ClusteringOrder, Column, ColumnKind, ColumnType, Table};
use std::sync::Arc;

const KINDS: [ColumnKind; 4] = [
    ColumnKind::PartitionKey,
    ColumnKind::Clustering,
    ColumnKind::Static,
    ColumnKind::Regular,
];

prop_compose! {
    fn arbitrary_column(name: String)(
        kind in 0..KINDS.len(),
        column_type in prop::option::of(0..ColumnType::ALL.len()),
        order in prop::option::of(any::<bool>()),
    ) -> Column {
        let mut column = Column::new(name.clone(), KINDS[kind]).unwrap();
        if let Some(t) = column_type {
            column = column.with_type(ColumnType::ALL[t]);
        }
        if let Some(desc) = order {
            let order = if desc { ClusteringOrder::Desc } else { ClusteringOrder::Asc };
            column = column.with_order(order);
        }
        column
    }
}

fn arbitrary_columns() -> impl Strategy<Value = Vec<Column>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,12}", 0..8).prop_flat_map(|names| {
        names
            .into_iter()
            .map(arbitrary_column)
            .collect::<Vec<_>>()
    })
}

fn arbitrary_cell() -> impl Strategy<Value = CellValue> {
    (
        "[a-z][a-z0-9_]{0,12}".prop_flat_map(arbitrary_column),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(column, value)| CellValue::new(column, value))
}

prop_compose! {
    fn arbitrary_event()(
        keyspace in "[a-z][a-z0-9_]{0,16}",
        name in "[a-z][a-z0-9_]{0,16}",
        columns in arbitrary_columns(),
        ttl in prop::option::of(0..=i32::MAX),
        timestamp in any::<Option<i64>>(),
        delete in any::<bool>(),
        partition_keys in prop::collection::vec(arbitrary_cell(), 0..4),
    ) -> MutationEvent {
        let table = Arc::new(Table::new(keyspace, name, columns).unwrap());
        let mutation_type = if delete {
            MutationEventType::Delete
        } else {
            MutationEventType::Update
        };
        MutationEvent {
            table,
            ttl,
            timestamp,
            mutation_type,
            partition_keys,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_event_roundtrip(event in arbitrary_event()) {
        let bytes = encode(&event).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), event.clone());

        let bare = MutationEventSerializer::new(SerializationConfig::bare());
        let bytes = bare.encode(&event).unwrap();
        prop_assert_eq!(bare.decode(&bytes).unwrap(), event);
    }

    #[test]
    fn test_encoding_is_deterministic(event in arbitrary_event()) {
        prop_assert_eq!(encode(&event).unwrap(), encode(&event).unwrap());
    }

    #[test]
    fn test_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }
}
