//! # Common CDC Types
//!
//! - [`BoundMutation`], [`RowsImpacted`], [`PrimaryKeyValue`] - statement input
//! - [`MutationEvent`], [`CellValue`] - derived, transport-ready event
//! - [`build_event`] - derivation from statement to event
//! - [`SerializationConfig`] - wire framing options
//! - [`CdcError`] - error type shared by all of the above

mod builder;
mod error;
mod event;
mod query;
mod serialization;

pub use builder::*;
pub use error::*;
pub use event::*;
pub use query::*;
pub use serialization::*;
