//! # sluice-cdc - Mutation events for Sluice CDC
//!
//! Turns bound write statements into compact, schema-described mutation
//! events and moves them across the wire as Avro binary.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   build_event   ┌──────────────────┐
//! │  BoundMutation   │ ──────────────▶ │  MutationEvent   │
//! │ kind, table, ttl │                 │ table, type, ttl │
//! │ rows, mods       │                 │ partition keys   │
//! └──────────────────┘                 └────────┬─────────┘
//!                                               │ encode / decode
//!                                               ▼
//!                              ┌──────────────────────────────┐
//!                              │ [0x00][schema id][avro datum] │
//!                              └──────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use sluice_cdc::{
//!     build_event, decode, encode, BoundMutation, PrimaryKeyValue, QueryKind, RowsImpacted,
//! };
//! use sluice_schema::{Codec, Column, ColumnKind, ColumnType, CqlCodec, Table, TypedValue};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Arc::new(Table::new(
//!     "shop",
//!     "orders",
//!     vec![
//!         Column::typed("id", ColumnKind::PartitionKey, ColumnType::Bigint)?,
//!         Column::typed("total", ColumnKind::Regular, ColumnType::Decimal)?,
//!     ],
//! )?);
//!
//! let codec: Arc<dyn Codec> = Arc::new(CqlCodec);
//! let id_column = table.columns()[0].clone();
//! let id = TypedValue::for_native(codec, id_column, ColumnType::Bigint, &42i64.into())?;
//! let key = PrimaryKeyValue::new(table.clone(), vec![id])?;
//! let mutation = BoundMutation::new(QueryKind::Delete, table, RowsImpacted::Keys(vec![key]));
//!
//! let event = build_event(&mutation)?;
//! let bytes = encode(&event)?;
//! assert_eq!(decode(&bytes)?, event);
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API Organization
//!
//! ### Tier 1: Core Types (crate root)
//! Statement and event model, event derivation and the serializer.
//!
//! ### Tier 2: Wire Codec (`avro` module)
//! Bare Avro datums and the wire schema, for consumers doing their own
//! framing.
//!
//! ### Tier 3: Advanced Types (`common` module)
//! Row selection details, modification operations and wire constants.

pub mod avro;
pub mod common;
mod serializer;

// =============================================================================
// TIER 1: Core Types
// =============================================================================

pub use common::{
    // Derivation
    build_event,
    build_events_per_key,
    // Statement model
    BoundMutation,
    // Error handling
    CdcError,
    // Event model
    CellValue,
    ErrorCategory,
    MutationEvent,
    MutationEventType,
    PrimaryKeyValue,
    QueryKind,
    Result,
    RowsImpacted,
    // Configuration
    SerializationConfig,
};

pub use serializer::{decode, encode, serialize_mutation, MutationEventSerializer};
