//! Error types for diffing and rendering.

use tabledef_core::SchemaError;

/// Errors that can occur while rendering schemas or migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A schema construction or reference error from the core.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Two indexes share the same table + column-set signature.
    #[error(
        "duplicate index: an index on table '{table}' with columns [{}] is \
         defined more than once",
        .columns.join(", ")
    )]
    DuplicateIndex {
        /// The indexed table.
        table: String,
        /// The duplicated column set.
        columns: Vec<String>,
    },

    /// An index targets a table absent from the registry.
    #[error("index '{index}' targets unknown table '{table}'")]
    UnknownTable {
        /// The offending index name.
        index: String,
        /// The missing table.
        table: String,
    },

    /// An index targets a column absent from its table.
    #[error("index '{index}' on table '{table}' targets unknown column '{column}'")]
    UnknownColumn {
        /// The offending index name.
        index: String,
        /// The indexed table.
        table: String,
        /// The missing column.
        column: String,
    },

    /// Snapshot serialization or deserialization failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
