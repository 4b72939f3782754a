//! Registry snapshots.
//!
//! A migration is a diff between the current registry and a snapshot of the
//! registry as it was when the last migration was generated. The host
//! runner decides where snapshots live; this module only round-trips a
//! registry through JSON.

use tabledef_core::prelude::SchemaRegistry;

use crate::error::Result;

/// Serializes a registry to pretty-printed JSON.
///
/// # Errors
///
/// Returns [`MigrateError::Snapshot`](crate::error::MigrateError::Snapshot)
/// if serialization fails.
pub fn to_json(registry: &SchemaRegistry) -> Result<String> {
    Ok(serde_json::to_string_pretty(registry)?)
}

/// Restores a registry from JSON produced by [`to_json`].
///
/// # Errors
///
/// Returns [`MigrateError::Snapshot`](crate::error::MigrateError::Snapshot)
/// if the input is not a valid snapshot.
pub fn from_json(json: &str) -> Result<SchemaRegistry> {
    Ok(serde_json::from_str(json)?)
}
