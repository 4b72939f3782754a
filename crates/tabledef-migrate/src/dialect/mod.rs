//! Dialect renderers.
//!
//! Each dialect knows how to render a registry's tables, indexes, and
//! per-change-entry ALTER statements for one database system, within that
//! system's capabilities. Dialects are stateless values; a renderer never
//! retains anything across calls beyond the table list the caller hands it.

mod postgres;
mod sqlite;

pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use tabledef_core::case::snake_case;
use tabledef_core::prelude::{ColumnDefinition, IndexDefinition, TableDefinition};

use crate::entry::ColumnChanges;
use crate::statement::MigrationStatement;

/// Advisory warning attached to every rendered column rename.
pub(crate) const RENAME_WARNING: &str = "Renaming columns is unsafe. In production,\n\
     first transfer data to a new column (expand)\n\
     and remove the old column later (contract).";

/// Trait for database-specific DDL generation.
pub trait SchemaDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Statement emitted before everything else, if the dialect needs one.
    fn preamble(&self) -> Option<String>;

    /// Returns the SQL type for a resolved column, honoring size bounds
    /// and large-text markers.
    fn type_name(&self, column: &ColumnDefinition) -> String;

    /// Returns whether this dialect can alter a column in place.
    fn supports_alter_column(&self) -> bool;

    /// Renders a full CREATE TABLE statement.
    fn render_table(&self, table: &TableDefinition) -> String;

    /// Renders one column definition fragment. Table-level constraint
    /// strings (named PRIMARY KEY / UNIQUE) are pushed onto `constraints`.
    fn column_fragment(&self, column: &ColumnDefinition, constraints: &mut Vec<String>) -> String;

    /// Renders a DROP TABLE statement.
    fn render_drop(&self, table: &str, if_exists: bool) -> MigrationStatement;

    /// Renders the drop-all sequence for a schema reset.
    fn render_reset(&self, tables: &[TableDefinition]) -> Vec<MigrationStatement> {
        tables
            .iter()
            .map(|table| self.render_drop(&table.name, true))
            .collect()
    }

    /// Renders an ALTER TABLE ADD COLUMN statement.
    fn render_add_column(&self, column: &ColumnDefinition) -> MigrationStatement;

    /// Renders an ALTER TABLE DROP COLUMN statement.
    fn render_drop_column(&self, column: &ColumnDefinition) -> MigrationStatement {
        MigrationStatement::from_sql(format!(
            "ALTER TABLE {} DROP COLUMN {};",
            self.quote_identifier(&column.table_name),
            self.quote_identifier(&column.name)
        ))
    }

    /// Renders the statement for one modified-column change entry, one
    /// clause per changed field. Fields the dialect cannot express come
    /// back as `invalid` notes instead of SQL.
    fn render_modify_column(
        &self,
        table: &str,
        before: &ColumnDefinition,
        after: &ColumnDefinition,
        changes: &ColumnChanges,
    ) -> MigrationStatement;

    /// Renders a CREATE INDEX statement.
    fn render_index(&self, index: &IndexDefinition) -> String;

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    /// Deterministic constraint name: `<table>_<column>_<kind>`.
    fn constraint_name(&self, table: &str, column: &str, kind: &str) -> String {
        format!("{table}_{}_{}", snake_case(column), snake_case(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_name_is_snake_cased() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.constraint_name("users", "stripeCustomerId", "unique"),
            "users_stripe_customer_id_unique"
        );
    }

    #[test]
    fn test_quote_identifier() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.quote_identifier("users"), "\"users\"");
    }

    #[test]
    fn test_alter_column_capability() {
        assert!(PostgresDialect::new().supports_alter_column());
        assert!(!SqliteDialect::new().supports_alter_column());
    }
}
