//! Schema registry.
//!
//! An ordered collection of resolved tables for one point in time.
//! Registration order is preserved everywhere; nothing is sorted behind the
//! caller's back. Cross-table reference validation happens once, at
//! [`SchemaRegistry::finalize`], after every table is known.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::AnnotationNode;
use crate::case::table_name_from_ident;
use crate::error::{Result, SchemaError};
use crate::resolve::resolve;
use crate::schema::{ColumnDefinition, IndexDefinition, TableDefinition};

/// Ordered, validated collection of table definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    tables: Vec<TableDefinition>,
    indexes: Vec<IndexDefinition>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one table: resolves each column's annotation tree and
    /// appends the table in registration order.
    ///
    /// The storage name is derived from `ident` by stripping the `Table`
    /// suffix and snake_casing the remainder.
    ///
    /// # Errors
    ///
    /// Fails fast on duplicate table names, duplicate column names within
    /// the table, and any column resolution error.
    pub fn register_table<S>(
        &mut self,
        ident: &str,
        columns: impl IntoIterator<Item = (S, AnnotationNode)>,
    ) -> Result<()>
    where
        S: Into<String>,
    {
        let table_name = table_name_from_ident(ident);
        if self.tables.iter().any(|t| t.name == table_name) {
            return Err(SchemaError::DuplicateTable(table_name));
        }

        let mut resolved: Vec<ColumnDefinition> = Vec::new();
        for (column_name, node) in columns {
            let column_name = column_name.into();
            if resolved.iter().any(|c| c.name == column_name) {
                return Err(SchemaError::DuplicateColumn {
                    table: table_name,
                    column: column_name,
                });
            }
            resolved.push(resolve(&table_name, &column_name, &node)?);
        }

        self.tables.push(TableDefinition {
            name: table_name,
            source_ident: ident.to_string(),
            columns: resolved,
        });
        Ok(())
    }

    /// Registers a secondary index. Index targets are validated at render
    /// time, against the finalized table list.
    pub fn register_index(&mut self, index: IndexDefinition) {
        self.indexes.push(index);
    }

    /// Validates every foreign-key target and rewrites it to the storage
    /// name of the referenced table.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Reference`] naming the offending column and
    /// enumerating the valid table identifiers.
    pub fn finalize(mut self) -> Result<Self> {
        let known: Vec<(String, String)> = self
            .tables
            .iter()
            .map(|t| (t.source_ident.clone(), t.name.clone()))
            .collect();

        for table in &mut self.tables {
            for column in &mut table.columns {
                let Some(target) = column.references_table.clone() else {
                    continue;
                };
                match resolve_target(&target, &known) {
                    Some(storage_name) => column.references_table = Some(storage_name),
                    None => {
                        return Err(SchemaError::Reference {
                            table: table.name.clone(),
                            column: column.name.clone(),
                            target,
                            valid: known.iter().map(|(ident, _)| ident.clone()).collect(),
                        });
                    }
                }
            }
        }

        debug!(tables = self.tables.len(), indexes = self.indexes.len(), "registry finalized");
        Ok(self)
    }

    /// Re-runs reference validation on an already-built registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Reference`] for the first unresolvable target.
    pub fn validate(&self) -> Result<()> {
        let known: Vec<(String, String)> = self
            .tables
            .iter()
            .map(|t| (t.source_ident.clone(), t.name.clone()))
            .collect();

        for table in &self.tables {
            for column in &table.columns {
                if let Some(target) = &column.references_table {
                    if resolve_target(target, &known).is_none() {
                        return Err(SchemaError::Reference {
                            table: table.name.clone(),
                            column: column.name.clone(),
                            target: target.clone(),
                            valid: known.iter().map(|(ident, _)| ident.clone()).collect(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Tables in registration order.
    #[must_use]
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    /// Registered indexes, in registration order.
    #[must_use]
    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }

    /// Gets a table by storage name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Matches a reference target against registered tables. Targets may be
/// spelled as the description identifier with or without the `Table` suffix,
/// or as the storage name itself.
fn resolve_target(target: &str, known: &[(String, String)]) -> Option<String> {
    let target_storage = table_name_from_ident(target);
    known
        .iter()
        .find(|(ident, storage)| {
            ident == target || *storage == target_storage || storage == target
        })
        .map(|(_, storage)| storage.clone())
}
