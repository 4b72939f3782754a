//! Entry operations.
//!
//! These combine the differ and a dialect renderer into the four calls a
//! host runner drives: render a full schema, render a reset, render a
//! reversible migration, and re-validate a registry. Persisting the output
//! and deciding what to do about warnings or invalid notes is the runner's
//! job.

use std::collections::HashSet;

use tracing::{debug, warn};

use tabledef_core::prelude::SchemaRegistry;

use crate::dialect::SchemaDialect;
use crate::differ::diff;
use crate::entry::ChangeEntry;
use crate::error::{MigrateError, Result};
use crate::statement::{MigrationPlan, MigrationStatement};

/// Renders the complete DDL for a registry: dialect preamble first, then
/// one CREATE TABLE per table in registration order, then indexes.
///
/// # Errors
///
/// Fails before rendering anything if two indexes share a table +
/// column-set signature, or an index targets an unknown table or column.
pub fn build_full_schema(
    registry: &SchemaRegistry,
    dialect: &dyn SchemaDialect,
) -> Result<Vec<String>> {
    validate_indexes(registry)?;

    let mut statements = Vec::new();
    if let Some(preamble) = dialect.preamble() {
        statements.push(preamble);
    }
    for table in registry.tables() {
        statements.push(dialect.render_table(table));
    }
    for index in registry.indexes() {
        statements.push(dialect.render_index(index));
    }

    debug!(dialect = dialect.name(), statements = statements.len(), "full schema rendered");
    Ok(statements)
}

/// Renders the drop-all sequence for a registry.
#[must_use]
pub fn build_reset(
    registry: &SchemaRegistry,
    dialect: &dyn SchemaDialect,
) -> Vec<MigrationStatement> {
    dialect.render_reset(registry.tables())
}

/// Renders a reversible migration between two registry snapshots.
///
/// The down direction is an independent diff with operands swapped, not an
/// inversion of the up statement list.
#[must_use]
pub fn build_migration(
    old: &SchemaRegistry,
    new: &SchemaRegistry,
    dialect: &dyn SchemaDialect,
) -> MigrationPlan {
    MigrationPlan {
        up: render_entries(&diff(old, new), dialect),
        down: render_entries(&diff(new, old), dialect),
    }
}

/// Re-runs reference and index validation on a registry.
///
/// # Errors
///
/// Returns the first reference or index error found.
pub fn validate(registry: &SchemaRegistry) -> Result<()> {
    registry.validate()?;
    validate_indexes(registry)
}

fn render_entries(entries: &[ChangeEntry], dialect: &dyn SchemaDialect) -> Vec<MigrationStatement> {
    entries
        .iter()
        .map(|entry| {
            debug!(dialect = dialect.name(), change = %entry.description(), "rendering change");
            let statement = match entry {
                ChangeEntry::TableAdded(table) => {
                    MigrationStatement::from_sql(dialect.render_table(table))
                }
                ChangeEntry::TableRemoved(name) => dialect.render_drop(name, true),
                ChangeEntry::ColumnAdded(column) => dialect.render_add_column(column),
                ChangeEntry::ColumnRemoved(column) => dialect.render_drop_column(column),
                ChangeEntry::ColumnModified { table, before, after, changes } => {
                    dialect.render_modify_column(table, before, after, changes)
                }
            };
            if !statement.invalid.is_empty() {
                warn!(
                    dialect = dialect.name(),
                    change = %entry.description(),
                    notes = statement.invalid.len(),
                    "change cannot be fully expressed by this dialect"
                );
            }
            statement
        })
        .collect()
}

fn validate_indexes(registry: &SchemaRegistry) -> Result<()> {
    let mut signatures = HashSet::new();

    for index in registry.indexes() {
        if !signatures.insert(index.signature()) {
            return Err(MigrateError::DuplicateIndex {
                table: index.table_name.clone(),
                columns: index.columns.clone(),
            });
        }

        let Some(table) = registry.get_table(&index.table_name) else {
            return Err(MigrateError::UnknownTable {
                index: index.effective_name(),
                table: index.table_name.clone(),
            });
        };
        for column in &index.columns {
            if table.get_column(column).is_none() {
                return Err(MigrateError::UnknownColumn {
                    index: index.effective_name(),
                    table: index.table_name.clone(),
                    column: column.clone(),
                });
            }
        }
    }

    Ok(())
}
