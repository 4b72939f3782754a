//! Canonical schema model.
//!
//! These types are what annotation resolution produces and what the differ
//! and dialect renderers consume. They carry no host-language syntax; a
//! column is a flat record of facts accumulated while unwrapping its
//! annotation tree.

use serde::{Deserialize, Serialize};

use crate::annotation::{DefaultExpr, ScalarType};

/// The type shape of one representation of a column (insert or update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnShape {
    /// Scalar type of this shape.
    pub base_type: ScalarType,
    /// Whether this shape admits null.
    pub nullable: bool,
}

/// One column of one table, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Storage name of the owning table.
    pub table_name: String,
    /// Column name, unique within its table.
    pub name: String,
    /// Canonical scalar type after unwrapping all annotations.
    pub base_type: ScalarType,
    /// Whether any unwrapping step encountered a null alternative.
    pub nullable: bool,
    /// Whether the column is database-generated.
    pub is_generated: bool,
    /// Whether the column is the primary key.
    pub is_primary_key: bool,
    /// Whether the column carries a UNIQUE constraint.
    pub is_unique: bool,
    /// Whether the column is unbounded large text.
    pub is_large_text: bool,
    /// Bounded-length marker for sized text.
    pub size_bound: Option<u32>,
    /// Normalized default value, if any.
    pub default_value: Option<DefaultExpr>,
    /// Foreign-key target table (storage name after registry finalization).
    pub references_table: Option<String>,
    /// Foreign-key target column.
    pub references_column: Option<String>,
    /// Insert-time shape when it diverges from the select shape.
    pub insert_shape: Option<ColumnShape>,
    /// Update-time shape when it diverges from the select shape.
    pub update_shape: Option<ColumnShape>,
    /// False iff the update shape is the `never` sentinel.
    pub is_updateable: bool,
}

impl ColumnDefinition {
    /// Creates a column with no flags set.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        name: impl Into<String>,
        base_type: ScalarType,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            name: name.into(),
            base_type,
            nullable: false,
            is_generated: false,
            is_primary_key: false,
            is_unique: false,
            is_large_text: false,
            size_bound: None,
            default_value: None,
            references_table: None,
            references_column: None,
            insert_shape: None,
            update_shape: None,
            is_updateable: true,
        }
    }

    /// Whether this column renders as the dialect's native auto-increment
    /// primary key idiom.
    #[must_use]
    pub const fn is_auto_increment(&self) -> bool {
        self.is_generated && self.is_primary_key
    }
}

/// One table: a storage name plus its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Storage name (snake_cased description identifier, suffix stripped).
    pub name: String,
    /// Description identifier the table was registered under.
    pub source_ident: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A secondary index over one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Storage name of the indexed table.
    pub table_name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether this is a UNIQUE index.
    pub unique: bool,
    /// Explicit index name; auto-named when absent.
    pub name: Option<String>,
}

impl IndexDefinition {
    /// Creates a non-unique index.
    #[must_use]
    pub fn new(table_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            unique: false,
            name: None,
        }
    }

    /// Makes this a unique index.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets an explicit name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The effective index name: explicit, or `idx_<table>_<columns…>`.
    #[must_use]
    pub fn effective_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            let columns: Vec<String> =
                self.columns.iter().map(|c| crate::case::snake_case(c)).collect();
            format!("idx_{}_{}", self.table_name, columns.join("_"))
        })
    }

    /// The duplicate-detection signature: same table + same column set.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}:{}", self.table_name, self.columns.join(","))
    }
}
