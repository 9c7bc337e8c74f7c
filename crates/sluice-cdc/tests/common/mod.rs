//! Shared fixtures for serializer tests
#![allow(dead_code)]

use sluice_cdc::{BoundMutation, PrimaryKeyValue, QueryKind, RowsImpacted};
use sluice_schema::{
    ClusteringOrder, Column, ColumnKind, ColumnType, CqlCodec, CqlValue, Table, TypedValue,
};
use std::sync::Arc;

/// `ks_1.table_1` with one partition key and three regular columns, one
/// of them untyped
pub fn mixed_table() -> Arc<Table> {
    Arc::new(
        Table::new(
            "ks_1",
            "table_1",
            vec![
                Column::typed("pk_1", ColumnKind::PartitionKey, ColumnType::Ascii)
                    .unwrap()
                    .with_order(ClusteringOrder::Asc),
                Column::typed("col_1", ColumnKind::Regular, ColumnType::Int).unwrap(),
                Column::new("col_2", ColumnKind::Regular).unwrap(),
                Column::new("col_3", ColumnKind::default())
                    .unwrap()
                    .with_type(ColumnType::Counter),
            ],
        )
        .unwrap(),
    )
}

/// `ks_1.table_1` with a composite partition key `(pk_1 int, pk_2 boolean)`
pub fn composite_key_table() -> Arc<Table> {
    Arc::new(
        Table::new(
            "ks_1",
            "table_1",
            vec![
                Column::typed("pk_1", ColumnKind::PartitionKey, ColumnType::Int).unwrap(),
                Column::typed("pk_2", ColumnKind::PartitionKey, ColumnType::Boolean).unwrap(),
                Column::typed("ck_1", ColumnKind::Clustering, ColumnType::Text)
                    .unwrap()
                    .with_order(ClusteringOrder::Desc),
                Column::typed("col_1", ColumnKind::Regular, ColumnType::Bigint).unwrap(),
            ],
        )
        .unwrap(),
    )
}

pub fn typed(table: &Table, column: &str, value: impl Into<CqlValue>) -> TypedValue {
    let column = table.column(column).unwrap().clone();
    let column_type = column.column_type().unwrap();
    TypedValue::for_native(Arc::new(CqlCodec), column, column_type, &value.into()).unwrap()
}

/// A mutation of `table` at the single key built from `values`
pub fn keyed_mutation(
    kind: QueryKind,
    table: &Arc<Table>,
    values: Vec<TypedValue>,
) -> BoundMutation {
    let key = PrimaryKeyValue::new(table.clone(), values).unwrap();
    BoundMutation::new(kind, table.clone(), RowsImpacted::Keys(vec![key]))
}
