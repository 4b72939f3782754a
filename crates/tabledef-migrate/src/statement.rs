//! Migration statement types.
//!
//! A [`MigrationStatement`] carries best-effort SQL alongside the non-fatal
//! diagnostics a dialect produced for it: advisory `warnings` for legal but
//! risky operations, and `invalid` notes for operations the dialect cannot
//! safely express. Neither is ever silently dropped; `sql` may be empty when
//! no safe rendering exists.

/// A change a dialect could not express, attached to the statement that
/// would have carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNote {
    /// The changed field the dialect rejected (e.g. `base_type`).
    pub field: String,
    /// What to do instead.
    pub message: String,
}

/// One rendered migration statement with its diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatement {
    /// Best-effort SQL; empty when no safe rendering exists.
    pub sql: String,
    /// Advisory warnings that never block execution.
    pub warnings: Vec<String>,
    /// Operations the dialect cannot safely express.
    pub invalid: Vec<InvalidNote>,
}

impl MigrationStatement {
    /// Creates a plain statement.
    #[must_use]
    pub fn from_sql(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            warnings: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// Creates a statement with no SQL, to carry diagnostics only.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attaches an advisory warning.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Attaches an invalid-operation note.
    #[must_use]
    pub fn with_invalid(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.invalid.push(InvalidNote {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    /// Whether the statement carries executable SQL.
    #[must_use]
    pub fn has_sql(&self) -> bool {
        !self.sql.is_empty()
    }
}

/// Up and down statement lists for one schema revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Statements transforming the old schema into the new one.
    pub up: Vec<MigrationStatement>,
    /// Statements transforming the new schema back into the old one,
    /// produced from an independent diff with operands swapped.
    pub down: Vec<MigrationStatement>,
}
