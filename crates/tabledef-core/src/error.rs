//! Error types for schema construction.

/// Errors raised while resolving annotations or building a registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Malformed or contradictory annotation nesting.
    #[error("column '{table}.{column}': {message}")]
    Construction {
        /// Table the column belongs to.
        table: String,
        /// The offending column.
        column: String,
        /// What was contradictory.
        message: String,
    },

    /// The same table was registered twice.
    #[error("table '{0}' is registered more than once")]
    DuplicateTable(String),

    /// The same column name appears twice in one table.
    #[error("column '{column}' is defined more than once in table '{table}'")]
    DuplicateColumn {
        /// Table containing the duplicate.
        table: String,
        /// The duplicated column name.
        column: String,
    },

    /// A foreign key targets a table that is not registered.
    #[error(
        "column '{table}.{column}' references \"{target}\", which does not \
         correspond to a registered table. Available tables are: {}",
        .valid.join(", ")
    )]
    Reference {
        /// Table containing the referencing column.
        table: String,
        /// The referencing column.
        column: String,
        /// The unresolvable target name.
        target: String,
        /// Every valid table identifier, for diagnosis.
        valid: Vec<String>,
    },
}

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;
