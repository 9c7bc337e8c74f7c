//! Avro binary codec for mutation events
//!
//! [`encode_datum`] and [`decode_datum`] work on bare Avro datums written
//! against [`WIRE_SCHEMA_JSON`]. Framing and size limits live in
//! [`crate::MutationEventSerializer`].

mod decoder;
mod encoder;
mod scan;
pub mod schema;

pub use decoder::decode_datum;
pub use encoder::encode_datum;
pub use schema::{wire_schema, WIRE_SCHEMA_JSON};
