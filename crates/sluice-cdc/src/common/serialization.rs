//! Serialization configuration for mutation events
//!
//! Events are Avro binary datums written against the fixed wire schema in
//! [`crate::avro`]. By default each datum is framed with the Confluent
//! wire header so consumers can reject bytes from an incompatible schema
//! before parsing:
//!
//! ```text
//! [0x00][schema_id: 4 bytes big-endian][avro datum]
//! ```
//!
//! # Example
//!
//! ```rust
//! use sluice_cdc::common::SerializationConfig;
//!
//! // Framed events (default)
//! let framed = SerializationConfig::default();
//! assert!(framed.confluent_wire_format);
//!
//! // Bare Avro datums for consumers that read the schema out of band
//! let bare = SerializationConfig::bare();
//! assert!(!bare.confluent_wire_format);
//! ```

use serde::{Deserialize, Serialize};

/// Id of the wire schema in [`crate::avro::WIRE_SCHEMA_JSON`]
pub const WIRE_SCHEMA_ID: u32 = 1;

/// Magic byte opening a framed event
pub const MAGIC_BYTE: u8 = 0x00;

/// Length of the frame header (magic byte + schema id)
pub const HEADER_LEN: usize = 5;

/// Default upper bound on encoded event size (16 MiB)
pub const DEFAULT_MAX_EVENT_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for mutation event serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationConfig {
    /// Prefix events with the 5-byte Confluent header
    #[serde(default = "default_true")]
    pub confluent_wire_format: bool,

    /// Schema id written into, and required from, the header
    #[serde(default = "default_schema_id")]
    pub schema_id: u32,

    /// Inputs larger than this are rejected before decoding
    #[serde(default = "default_max_event_size")]
    pub max_event_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_schema_id() -> u32 {
    WIRE_SCHEMA_ID
}

fn default_max_event_size() -> usize {
    DEFAULT_MAX_EVENT_SIZE
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self {
            confluent_wire_format: true,
            schema_id: WIRE_SCHEMA_ID,
            max_event_size: DEFAULT_MAX_EVENT_SIZE,
        }
    }
}

impl SerializationConfig {
    /// Bare Avro datums, no header
    pub fn bare() -> Self {
        Self {
            confluent_wire_format: false,
            ..Default::default()
        }
    }

    /// Set Confluent wire format
    pub fn with_confluent_wire_format(mut self, enabled: bool) -> Self {
        self.confluent_wire_format = enabled;
        self
    }

    /// Set the schema id used in the header
    pub fn with_schema_id(mut self, schema_id: u32) -> Self {
        self.schema_id = schema_id;
        self
    }

    /// Set the maximum accepted event size
    pub fn with_max_event_size(mut self, max_event_size: usize) -> Self {
        self.max_event_size = max_event_size;
        self
    }
}
