//! # sluice-schema - Schema model and typed values
//!
//! Static table schema plus the value layer mutations are expressed in:
//!
//! - [`ColumnType`] - closed registry of CQL types with stable wire ids
//! - [`Column`], [`Table`] - immutable schema description, shared read-only
//! - [`CqlValue`] - decoded native values
//! - [`Codec`] - pluggable conversion between native values and raw bytes
//!   ([`CqlCodec`] for driver-compatible bytes, [`TextCodec`] for tests)
//! - [`TypedValue`] - a column value held as raw bytes plus its type
//!
//! ```rust
//! use std::sync::Arc;
//! use sluice_schema::{Column, ColumnKind, ColumnType, CqlCodec, CqlValue, TypedValue};
//!
//! let pk = Column::typed("id", ColumnKind::PartitionKey, ColumnType::Int)?;
//! let value = TypedValue::for_native(Arc::new(CqlCodec), pk, ColumnType::Int, &CqlValue::Int(7))?;
//! assert_eq!(value.native()?, CqlValue::Int(7));
//! # Ok::<(), sluice_schema::SchemaError>(())
//! ```

pub mod codec;
mod error;
pub mod serde_utils;
mod table;
mod typed_value;
mod types;
mod value;

pub use codec::{Codec, CqlCodec, TextCodec};
pub use error::{Result, SchemaError};
pub use table::{Column, Table};
pub use typed_value::TypedValue;
pub use types::{ClusteringOrder, ColumnKind, ColumnType};
pub use value::{CqlDecimal, CqlDuration, CqlValue};
