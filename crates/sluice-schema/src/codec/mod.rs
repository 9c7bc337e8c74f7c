//! Value codecs
//!
//! A [`Codec`] converts between [`CqlValue`]s and their raw byte form for a
//! given [`ColumnType`]. Codecs are injected into [`TypedValue`] construction
//! so a driver codec and a test codec can be swapped freely.
//!
//! - [`CqlCodec`] - CQL native protocol value encodings
//! - [`TextCodec`] - canonical UTF-8 text rendering, for tests and debugging
//!
//! [`TypedValue`]: crate::TypedValue

mod cql;
mod text;

pub use cql::CqlCodec;
pub use text::TextCodec;

use crate::error::{Result, SchemaError};
use crate::types::ColumnType;
use crate::value::CqlValue;
use bytes::Bytes;

/// Converts native values to and from raw bytes, per column type
///
/// `encode` and `decode` must be total for every type where `supports`
/// returns true.
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// Name used in errors and logs
    fn name(&self) -> &'static str;

    /// Check if the codec handles this column type
    fn supports(&self, column_type: ColumnType) -> bool;

    /// Encode a native value as the given type
    fn encode(&self, column_type: ColumnType, value: &CqlValue) -> Result<Bytes>;

    /// Decode raw bytes of the given type
    fn decode(&self, column_type: ColumnType, bytes: &[u8]) -> Result<CqlValue>;
}

/// Shared precondition for scalar codecs: the type is supported and the
/// value actually belongs to it.
pub(crate) fn check_encodable(
    codec: &dyn Codec,
    column_type: ColumnType,
    value: &CqlValue,
) -> Result<()> {
    if !codec.supports(column_type) {
        return Err(unsupported(codec, column_type));
    }
    if !value.fits(column_type) {
        return Err(SchemaError::ValueTypeMismatch {
            expected: column_type,
            actual: value.type_name(),
        });
    }
    Ok(())
}

pub(crate) fn unsupported(codec: &dyn Codec, column_type: ColumnType) -> SchemaError {
    SchemaError::UnsupportedType {
        codec: codec.name(),
        column_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_codecs_are_swappable() {
        let codecs: Vec<Arc<dyn Codec>> = vec![Arc::new(CqlCodec), Arc::new(TextCodec)];
        for codec in codecs {
            let raw = codec.encode(ColumnType::Int, &CqlValue::Int(42)).unwrap();
            assert_eq!(codec.decode(ColumnType::Int, &raw).unwrap(), CqlValue::Int(42));
        }
    }

    #[test]
    fn test_scalar_types_supported() {
        for t in ColumnType::ALL {
            assert_eq!(CqlCodec.supports(t), !t.is_parameterized());
            assert_eq!(TextCodec.supports(t), !t.is_parameterized());
        }
    }
}
