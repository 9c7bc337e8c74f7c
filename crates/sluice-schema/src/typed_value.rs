//! Column values carrying both their schema type and raw bytes

use crate::codec::Codec;
use crate::error::{Result, SchemaError};
use crate::table::Column;
use crate::types::ColumnType;
use crate::value::CqlValue;
use bytes::Bytes;
use std::sync::Arc;

/// A value bound to one column, held in encoded form
///
/// The declared `column_type` is always the type the raw bytes were
/// produced with. When the column itself declares a type, the two must
/// agree; construction fails with [`SchemaError::CodecMismatch`] otherwise.
#[derive(Clone)]
pub struct TypedValue {
    codec: Arc<dyn Codec>,
    column: Column,
    column_type: ColumnType,
    raw: Bytes,
}

impl TypedValue {
    /// Encode a native value (producer side)
    pub fn for_native(
        codec: Arc<dyn Codec>,
        column: Column,
        column_type: ColumnType,
        value: &CqlValue,
    ) -> Result<Self> {
        check_declared(&column, column_type)?;
        let raw = codec.encode(column_type, value)?;
        Ok(Self {
            codec,
            column,
            column_type,
            raw,
        })
    }

    /// Wrap already encoded bytes (consumer side)
    pub fn for_bytes(
        codec: Arc<dyn Codec>,
        column: Column,
        column_type: ColumnType,
        raw: impl Into<Bytes>,
    ) -> Result<Self> {
        check_declared(&column, column_type)?;
        Ok(Self {
            codec,
            column,
            column_type,
            raw: raw.into(),
        })
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Encoded bytes
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Decode the raw bytes with the codec this value was built with
    pub fn native(&self) -> Result<CqlValue> {
        self.codec.decode(self.column_type, &self.raw)
    }

    /// Name of the codec that produced the raw bytes
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }
}

fn check_declared(column: &Column, column_type: ColumnType) -> Result<()> {
    match column.column_type() {
        Some(declared) if declared != column_type => Err(SchemaError::CodecMismatch {
            column: column.name().to_string(),
            declared,
            actual: column_type,
        }),
        _ => Ok(()),
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column
            && self.column_type == other.column_type
            && self.raw == other.raw
    }
}

impl std::fmt::Debug for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedValue")
            .field("column", &self.column.name())
            .field("type", &self.column_type)
            .field("codec", &self.codec.name())
            .field("raw", &self.raw)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CqlCodec, TextCodec};
    use crate::types::ColumnKind;

    fn pk(name: &str, column_type: ColumnType) -> Column {
        Column::typed(name, ColumnKind::PartitionKey, column_type).unwrap()
    }

    #[test]
    fn test_native_roundtrip() {
        let value = TypedValue::for_native(
            Arc::new(CqlCodec),
            pk("pk_1", ColumnType::Int),
            ColumnType::Int,
            &CqlValue::Int(1),
        )
        .unwrap();

        assert_eq!(value.raw().as_ref(), &[0, 0, 0, 1]);
        assert_eq!(value.native().unwrap(), CqlValue::Int(1));
        assert_eq!(value.codec_name(), "cql");
    }

    #[test]
    fn test_bytes_side() {
        let value = TypedValue::for_bytes(
            Arc::new(TextCodec),
            pk("pk_2", ColumnType::Boolean),
            ColumnType::Boolean,
            Bytes::from_static(b"true"),
        )
        .unwrap();

        assert_eq!(value.native().unwrap(), CqlValue::Boolean(true));
    }

    #[test]
    fn test_declared_type_mismatch() {
        let err = TypedValue::for_native(
            Arc::new(CqlCodec),
            pk("pk_1", ColumnType::Int),
            ColumnType::Ascii,
            &CqlValue::Ascii("v".into()),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchemaError::CodecMismatch {
                column: "pk_1".to_string(),
                declared: ColumnType::Int,
                actual: ColumnType::Ascii,
            }
        );
    }

    #[test]
    fn test_untyped_column_accepts_any_type() {
        let column = Column::new("col_2", ColumnKind::Regular).unwrap();
        let value =
            TypedValue::for_native(Arc::new(CqlCodec), column, ColumnType::Text, &"v".into())
                .unwrap();
        assert_eq!(value.column_type(), ColumnType::Text);
    }

    #[test]
    fn test_equality_ignores_codec_identity() {
        let a = TypedValue::for_bytes(
            Arc::new(CqlCodec),
            pk("pk", ColumnType::Blob),
            ColumnType::Blob,
            vec![1, 2],
        )
        .unwrap();
        let b = TypedValue::for_bytes(
            Arc::new(TextCodec),
            pk("pk", ColumnType::Blob),
            ColumnType::Blob,
            vec![1, 2],
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
