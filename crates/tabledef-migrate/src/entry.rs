//! Change entries.
//!
//! The differ classifies every structural difference between two registries
//! into one [`ChangeEntry`]; dialects consume entries immediately to render
//! SQL. Entries are not persisted.

use tabledef_core::prelude::{ColumnDefinition, DefaultExpr, ScalarType, TableDefinition};

/// How one optional property moved between two column revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// The property is new.
    Added(T),
    /// The property was dropped.
    Removed(T),
    /// The property changed value.
    Altered {
        /// The previous value.
        from: T,
        /// The new value.
        to: T,
    },
}

/// Per-field change markers for one modified column.
///
/// `Option<bool>` fields carry the new value of a flag (`Some(true)` = the
/// flag was added, `Some(false)` = removed); `Change<T>` fields carry
/// added/removed/altered markers for valued properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnChanges {
    /// Previous name, when the entry represents a rename.
    pub renamed_from: Option<String>,
    /// Base scalar type change.
    pub base_type: Option<Change<ScalarType>>,
    /// New nullability.
    pub nullable: Option<bool>,
    /// Size bound added, removed, or altered.
    pub size_bound: Option<Change<u32>>,
    /// New large-text flag.
    pub large_text: Option<bool>,
    /// Default value added, removed, or altered.
    pub default: Option<Change<DefaultExpr>>,
    /// New uniqueness flag.
    pub unique: Option<bool>,
    /// New primary-key flag.
    pub primary_key: Option<bool>,
    /// New generated flag.
    pub generated: Option<bool>,
}

impl ColumnChanges {
    /// True when no field changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.renamed_from.is_none()
            && self.base_type.is_none()
            && self.nullable.is_none()
            && self.size_bound.is_none()
            && self.large_text.is_none()
            && self.default.is_none()
            && self.unique.is_none()
            && self.primary_key.is_none()
            && self.generated.is_none()
    }

    /// True when the only change is the column's name.
    #[must_use]
    pub const fn is_bare_rename(&self) -> bool {
        self.renamed_from.is_some()
            && self.base_type.is_none()
            && self.nullable.is_none()
            && self.size_bound.is_none()
            && self.large_text.is_none()
            && self.default.is_none()
            && self.unique.is_none()
            && self.primary_key.is_none()
            && self.generated.is_none()
    }
}

/// One structural difference between two registries.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEntry {
    /// A table exists only in the new registry.
    TableAdded(TableDefinition),
    /// A table exists only in the old registry.
    TableRemoved(String),
    /// A column exists only in the new revision of its table.
    ColumnAdded(ColumnDefinition),
    /// A column exists only in the old revision of its table.
    ColumnRemoved(ColumnDefinition),
    /// A column changed in place (possibly renamed).
    ColumnModified {
        /// The owning table's storage name.
        table: String,
        /// The column as it was.
        before: ColumnDefinition,
        /// The column as it is now.
        after: ColumnDefinition,
        /// Which fields drove the change.
        changes: ColumnChanges,
    },
}

impl ChangeEntry {
    /// A human-readable description, for logging.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::TableAdded(table) => format!("add table '{}'", table.name),
            Self::TableRemoved(name) => format!("remove table '{name}'"),
            Self::ColumnAdded(column) => {
                format!("add column '{}.{}'", column.table_name, column.name)
            }
            Self::ColumnRemoved(column) => {
                format!("remove column '{}.{}'", column.table_name, column.name)
            }
            Self::ColumnModified { table, after, changes, .. } => {
                if let Some(old) = &changes.renamed_from {
                    format!("rename column '{table}.{old}' to '{}'", after.name)
                } else {
                    format!("modify column '{table}.{}'", after.name)
                }
            }
        }
    }
}
