//! Mutation event serializer
//!
//! Wraps the Avro codec in [`crate::avro`] with the framing and size limits
//! of a [`SerializationConfig`].

use crate::avro::{decode_datum, encode_datum};
use crate::common::{
    build_event, BoundMutation, CdcError, MutationEvent, Result, SerializationConfig, HEADER_LEN,
    MAGIC_BYTE,
};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

/// Encodes and decodes [`MutationEvent`]s.
///
/// Holds only immutable configuration; share it freely between threads.
#[derive(Debug, Clone, Default)]
pub struct MutationEventSerializer {
    config: SerializationConfig,
}

impl MutationEventSerializer {
    pub fn new(config: SerializationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializationConfig {
        &self.config
    }

    /// Encode an event into its wire form.
    ///
    /// `max_event_size` only bounds what [`decode`](Self::decode) accepts;
    /// encoding a large event succeeds.
    pub fn encode(&self, event: &MutationEvent) -> Result<Bytes> {
        let datum = encode_datum(event)?;

        let bytes = if self.config.confluent_wire_format {
            let mut buf = BytesMut::with_capacity(HEADER_LEN + datum.len());
            buf.put_u8(MAGIC_BYTE);
            buf.put_u32(self.config.schema_id);
            buf.extend_from_slice(&datum);
            buf.freeze()
        } else {
            Bytes::from(datum)
        };

        debug!(
            keyspace = event.table.keyspace(),
            table = event.table.name(),
            bytes = bytes.len(),
            mutation_type = %event.mutation_type,
            "Encoded mutation event"
        );
        Ok(bytes)
    }

    /// Decode an event from its wire form.
    ///
    /// Either the whole event is returned or an error; there is no
    /// partially decoded result.
    pub fn decode(&self, bytes: &[u8]) -> Result<MutationEvent> {
        match self.decode_inner(bytes) {
            Ok(event) => {
                debug!(
                    keyspace = event.table.keyspace(),
                    table = event.table.name(),
                    bytes = bytes.len(),
                    "Decoded mutation event"
                );
                Ok(event)
            }
            Err(e) => {
                warn!(
                    bytes = bytes.len(),
                    category = ?e.category(),
                    error = %e,
                    "Failed to decode mutation event"
                );
                Err(e)
            }
        }
    }

    fn decode_inner(&self, bytes: &[u8]) -> Result<MutationEvent> {
        if bytes.len() > self.config.max_event_size {
            return Err(CdcError::malformed(format!(
                "event is {} bytes, limit is {}",
                bytes.len(),
                self.config.max_event_size
            )));
        }

        let datum = if self.config.confluent_wire_format {
            self.strip_header(bytes)?
        } else {
            bytes
        };

        decode_datum(datum)
    }

    fn strip_header<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        if bytes.len() < HEADER_LEN {
            return Err(CdcError::malformed(format!(
                "event too short for wire header: {} bytes",
                bytes.len()
            )));
        }
        if bytes[0] != MAGIC_BYTE {
            return Err(CdcError::malformed(format!(
                "invalid magic byte: expected {:#04x}, got {:#04x}",
                MAGIC_BYTE, bytes[0]
            )));
        }
        let schema_id = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        if schema_id != self.config.schema_id {
            return Err(CdcError::malformed(format!(
                "unexpected schema id {}, expected {}",
                schema_id, self.config.schema_id
            )));
        }
        Ok(&bytes[HEADER_LEN..])
    }

    /// Derive the event for a mutation and encode it.
    pub fn serialize_mutation(&self, mutation: &BoundMutation) -> Result<Bytes> {
        self.encode(&build_event(mutation)?)
    }
}

/// Encode an event with the default configuration.
pub fn encode(event: &MutationEvent) -> Result<Bytes> {
    MutationEventSerializer::default().encode(event)
}

/// Decode an event with the default configuration.
pub fn decode(bytes: &[u8]) -> Result<MutationEvent> {
    MutationEventSerializer::default().decode(bytes)
}

/// Derive and encode the event for a mutation with the default configuration.
pub fn serialize_mutation(mutation: &BoundMutation) -> Result<Bytes> {
    MutationEventSerializer::default().serialize_mutation(mutation)
}
