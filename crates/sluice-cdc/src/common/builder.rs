//! Mutation event derivation
//!
//! Turns a [`BoundMutation`] into its [`MutationEvent`]:
//!
//! - `DELETE` becomes [`MutationEventType::Delete`], every other kind
//!   [`MutationEventType::Update`]
//! - TTL and timestamp are copied, absence stays absence
//! - partition keys come from the first key of a `Keys` mutation, keeping
//!   only partition key columns in order; other row selections have none
//! - the table is copied whole
//!
//! One event describes one key. Statements touching several keys are
//! expanded at the call site, see [`build_events_per_key`].

use crate::common::{
    BoundMutation, CdcError, CellValue, MutationEvent, MutationEventType, PrimaryKeyValue,
    QueryKind, Result, RowsImpacted,
};
use sluice_schema::{Table, TypedValue};
use tracing::trace;

/// Derive the event for a mutation.
pub fn build_event(mutation: &BoundMutation) -> Result<MutationEvent> {
    build_for_key(mutation, mutation.rows_impacted.keys().first())
}

/// Derive one event per impacted key.
///
/// Non-point mutations, and `Keys` mutations with an empty key list, yield
/// a single event without partition keys.
pub fn build_events_per_key(mutation: &BoundMutation) -> Result<Vec<MutationEvent>> {
    match &mutation.rows_impacted {
        RowsImpacted::Keys(keys) if !keys.is_empty() => keys
            .iter()
            .map(|key| build_for_key(mutation, Some(key)))
            .collect(),
        _ => Ok(vec![build_event(mutation)?]),
    }
}

impl TryFrom<&BoundMutation> for MutationEvent {
    type Error = CdcError;

    fn try_from(mutation: &BoundMutation) -> Result<Self> {
        build_event(mutation)
    }
}

/// Map a statement kind to the event type consumers see
pub fn event_type(kind: QueryKind) -> MutationEventType {
    match kind {
        QueryKind::Delete => MutationEventType::Delete,
        QueryKind::Insert | QueryKind::Update => MutationEventType::Update,
    }
}

fn build_for_key(mutation: &BoundMutation, key: Option<&PrimaryKeyValue>) -> Result<MutationEvent> {
    if let Some(ttl) = mutation.ttl.filter(|ttl| *ttl < 0) {
        return Err(CdcError::invalid_mutation(format!("negative ttl {}", ttl)));
    }

    let partition_keys = match key {
        Some(key) => partition_key_cells(&mutation.table, key)?,
        None => Vec::new(),
    };

    trace!(
        table = %mutation.table,
        kind = %mutation.kind,
        rows = %mutation.rows_impacted,
        partition_keys = partition_keys.len(),
        "Derived mutation event"
    );

    Ok(MutationEvent {
        table: mutation.table.clone(),
        ttl: mutation.ttl,
        timestamp: mutation.timestamp,
        mutation_type: event_type(mutation.kind),
        partition_keys,
    })
}

fn partition_key_cells(table: &Table, key: &PrimaryKeyValue) -> Result<Vec<CellValue>> {
    if key.table().keyspace() != table.keyspace() || key.table().name() != table.name() {
        return Err(CdcError::invalid_mutation(format!(
            "key bound to {} used in a mutation of {}",
            key.table(),
            table
        )));
    }

    key.partition_key_values()
        .map(|value| {
            check_against_table(table, value)?;
            Ok(CellValue::new(value.column().clone(), value.raw().clone()))
        })
        .collect()
}

// The value must have been encoded with the type the table declares for
// its column, otherwise consumers would decode the bytes as the wrong type.
fn check_against_table(table: &Table, value: &TypedValue) -> Result<()> {
    let name = value.column().name();
    match table.column(name).and_then(|c| c.column_type()) {
        Some(declared) if declared != value.column_type() => Err(CdcError::CodecMismatch {
            column: name.to_string(),
            declared,
            actual: value.column_type(),
        }),
        _ => Ok(()),
    }
}
