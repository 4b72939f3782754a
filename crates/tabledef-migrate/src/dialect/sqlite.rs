//! SQLite dialect.
//!
//! The capability-limited variant: no ALTER COLUMN at all, a simplified
//! type system (booleans and dates fold to INTEGER/TEXT), and constraints
//! declared inline at table creation. Anything beyond a column rename
//! comes back as invalid notes pointing at an expand/contract rollout.

use tabledef_core::annotation::{DefaultExpr, ScalarType};
use tabledef_core::prelude::{ColumnDefinition, IndexDefinition, TableDefinition};

use crate::entry::ColumnChanges;
use crate::statement::MigrationStatement;

use super::{SchemaDialect, RENAME_WARNING};

/// Message attached to every column change SQLite cannot express in place.
const ALTER_UNSUPPORTED: &str = "SQLite doesn't support altering columns in place.\n\
     First transfer data to a new column (expand)\n\
     and remove the old column later (contract).";

/// SQLite schema dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn scalar_type_name(scalar: &ScalarType) -> &'static str {
        match scalar {
            ScalarType::Number | ScalarType::Boolean => "INTEGER",
            ScalarType::String
            | ScalarType::Date
            | ScalarType::Never
            | ScalarType::Opaque(_) => "TEXT",
        }
    }

    fn default_value_sql(default: &DefaultExpr) -> String {
        match default {
            // Translate the portable timestamp expression to the native form.
            DefaultExpr::Expr(expr) if expr == "now()" => "(datetime('now'))".to_string(),
            DefaultExpr::Expr(expr) => expr.clone(),
            DefaultExpr::Str(value) => format!("'{}'", value.replace('\'', "''")),
        }
    }

    fn foreign_key_constraints(table: &TableDefinition) -> Vec<String> {
        let mut constraints = Vec::new();
        for column in &table.columns {
            if let (Some(ref_table), Some(ref_column)) =
                (&column.references_table, &column.references_column)
            {
                constraints.push(format!(
                    "FOREIGN KEY(\"{}\") REFERENCES \"{ref_table}\"(\"{ref_column}\")",
                    column.name
                ));
            }
        }
        constraints
    }
}

impl SchemaDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn preamble(&self) -> Option<String> {
        Some("PRAGMA foreign_keys = ON;".to_string())
    }

    fn type_name(&self, column: &ColumnDefinition) -> String {
        if column.is_large_text {
            return "TEXT".to_string();
        }
        if let Some(size) = column.size_bound {
            if column.base_type == ScalarType::String {
                return format!("VARCHAR({size})");
            }
            return "TEXT".to_string();
        }
        Self::scalar_type_name(&column.base_type).to_string()
    }

    fn supports_alter_column(&self) -> bool {
        false
    }

    fn render_table(&self, table: &TableDefinition) -> String {
        let mut constraints = Vec::new();
        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|column| format!("  {}", self.column_fragment(column, &mut constraints)))
            .collect();

        for fk in Self::foreign_key_constraints(table) {
            lines.push(format!("  {fk}"));
        }
        for constraint in constraints {
            lines.push(format!("  {constraint}"));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n);",
            table.name,
            lines.join(",\n")
        )
    }

    fn column_fragment(&self, column: &ColumnDefinition, constraints: &mut Vec<String>) -> String {
        let mut fragment = format!("\"{}\" ", column.name);

        // Primary keys bypass normal type/default/nullable rendering;
        // SQLite's rowid idiom requires INTEGER here.
        if column.is_auto_increment() {
            fragment.push_str("INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL");
        } else if column.is_primary_key {
            fragment.push_str("INTEGER PRIMARY KEY NOT NULL");
        } else {
            fragment.push_str(&self.type_name(column));
            if let Some(default) = &column.default_value {
                fragment.push_str(" DEFAULT ");
                fragment.push_str(&Self::default_value_sql(default));
            }
            if !column.nullable {
                fragment.push_str(" NOT NULL");
            }
        }

        if column.is_unique && !column.is_primary_key {
            constraints.push(format!(
                "CONSTRAINT \"{}\" UNIQUE(\"{}\")",
                self.constraint_name(&column.table_name, &column.name, "unique"),
                column.name
            ));
        }

        fragment
    }

    fn render_drop(&self, table: &str, if_exists: bool) -> MigrationStatement {
        let exists = if if_exists { " IF EXISTS" } else { "" };
        MigrationStatement::from_sql(format!("DROP TABLE{exists} \"{table}\";"))
    }

    fn render_reset(&self, tables: &[TableDefinition]) -> Vec<MigrationStatement> {
        if tables.is_empty() {
            return Vec::new();
        }
        let mut statements = vec![MigrationStatement::from_sql("PRAGMA foreign_keys = OFF;")];
        for table in tables {
            statements.push(self.render_drop(&table.name, true));
        }
        statements.push(MigrationStatement::from_sql("PRAGMA foreign_keys = ON;"));
        statements
    }

    fn render_add_column(&self, column: &ColumnDefinition) -> MigrationStatement {
        let mut statement = MigrationStatement::empty();

        if column.is_auto_increment() {
            return statement.with_invalid(
                "generated",
                "an auto-increment primary key cannot be added to an existing \
                 table in SQLite; recreate the table instead",
            );
        }

        // Inline constraints are only legal at table creation; a unique
        // column added later gets a unique index instead.
        let mut discarded = Vec::new();
        let fragment = self.column_fragment(column, &mut discarded);
        let mut sql = format!("ALTER TABLE \"{}\" ADD COLUMN {fragment};", column.table_name);

        if column.is_unique && !column.is_primary_key {
            sql.push('\n');
            sql.push_str(&format!(
                "CREATE UNIQUE INDEX \"{}\" ON \"{}\" (\"{}\");",
                self.constraint_name(&column.table_name, &column.name, "unique"),
                column.table_name,
                column.name
            ));
        }

        statement.sql = sql;
        statement
    }

    fn render_modify_column(
        &self,
        table: &str,
        _before: &ColumnDefinition,
        after: &ColumnDefinition,
        changes: &ColumnChanges,
    ) -> MigrationStatement {
        let mut statement = MigrationStatement::empty();

        let unsupported: [(&str, bool); 8] = [
            ("base_type", changes.base_type.is_some()),
            ("nullable", changes.nullable.is_some()),
            ("size_bound", changes.size_bound.is_some()),
            ("large_text", changes.large_text.is_some()),
            ("default", changes.default.is_some()),
            ("unique", changes.unique.is_some()),
            ("primary_key", changes.primary_key.is_some()),
            ("generated", changes.generated.is_some()),
        ];
        for (field, changed) in unsupported {
            if changed {
                statement = statement.with_invalid(field, ALTER_UNSUPPORTED);
            }
        }

        if let Some(old_name) = &changes.renamed_from {
            statement.sql = format!(
                "ALTER TABLE \"{table}\" RENAME COLUMN \"{old_name}\" TO \"{}\";",
                after.name
            );
            statement = statement.with_warning(RENAME_WARNING);
        }

        statement
    }

    fn render_index(&self, index: &IndexDefinition) -> String {
        let kind = if index.unique {
            "CREATE UNIQUE INDEX"
        } else {
            "CREATE INDEX"
        };
        let columns: Vec<String> = index.columns.iter().map(|c| format!("\"{c}\"")).collect();
        format!(
            "{kind} IF NOT EXISTS \"{}\" ON \"{}\" ({});",
            index.effective_name(),
            index.table_name,
            columns.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabledef_core::prelude::{AnnotationNode, SchemaRegistry};

    fn dialect() -> SqliteDialect {
        SqliteDialect::new()
    }

    fn resolve(name: &str, node: &AnnotationNode) -> ColumnDefinition {
        tabledef_core::resolve::resolve("users", name, node).unwrap()
    }

    #[test]
    fn test_auto_increment_primary_key_idiom() {
        let mut constraints = Vec::new();
        let fragment = dialect().column_fragment(
            &resolve("id", &AnnotationNode::number().primary().generated()),
            &mut constraints,
        );
        assert_eq!(fragment, "\"id\" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL");
        assert!(constraints.is_empty());
    }

    #[test]
    fn test_render_users_table() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_table(
                "UsersTable",
                vec![
                    ("id", AnnotationNode::number().primary().generated()),
                    ("email", AnnotationNode::string().sized(255).unique()),
                    (
                        "createdAt",
                        AnnotationNode::date().with_default(DefaultExpr::expr("now()")),
                    ),
                ],
            )
            .unwrap();
        let registry = registry.finalize().unwrap();

        let sql = dialect().render_table(&registry.tables()[0].clone());
        assert!(sql.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL"));
        assert!(sql.contains("\"email\" VARCHAR(255) NOT NULL"));
        assert!(sql.contains("\"createdAt\" TEXT DEFAULT (datetime('now')) NOT NULL"));
        assert!(sql.contains("CONSTRAINT \"users_email_unique\" UNIQUE(\"email\")"));
    }

    #[test]
    fn test_inline_foreign_key() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_table("TeamsTable", vec![("id", AnnotationNode::number().primary())])
            .unwrap();
        registry
            .register_table(
                "TeamMembersTable",
                vec![(
                    "teamId",
                    AnnotationNode::reference("TeamsTable", "id", AnnotationNode::number()),
                )],
            )
            .unwrap();
        let registry = registry.finalize().unwrap();

        let sql = dialect().render_table(&registry.tables()[1].clone());
        assert!(sql.contains("FOREIGN KEY(\"teamId\") REFERENCES \"teams\"(\"id\")"));
    }

    #[test]
    fn test_simplified_type_system() {
        let d = dialect();
        assert_eq!(d.type_name(&resolve("a", &AnnotationNode::boolean())), "INTEGER");
        assert_eq!(d.type_name(&resolve("b", &AnnotationNode::date())), "TEXT");
        assert_eq!(d.type_name(&resolve("c", &AnnotationNode::string().text())), "TEXT");
        assert_eq!(d.type_name(&resolve("d", &AnnotationNode::string().sized(100))), "VARCHAR(100)");
        assert_eq!(d.type_name(&resolve("e", &AnnotationNode::opaque("Json"))), "TEXT");
    }

    #[test]
    fn test_reset_toggles_foreign_key_enforcement() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_table("UsersTable", vec![("id", AnnotationNode::number().primary())])
            .unwrap();
        let registry = registry.finalize().unwrap();

        let statements = dialect().render_reset(registry.tables());
        assert_eq!(statements.first().unwrap().sql, "PRAGMA foreign_keys = OFF;");
        assert_eq!(statements.last().unwrap().sql, "PRAGMA foreign_keys = ON;");
        assert_eq!(statements[1].sql, "DROP TABLE IF EXISTS \"users\";");
    }

    #[test]
    fn test_reset_of_empty_schema_is_empty() {
        assert!(dialect().render_reset(&[]).is_empty());
    }

    #[test]
    fn test_modify_column_type_is_invalid() {
        let before = resolve("age", &AnnotationNode::string());
        let after = resolve("age", &AnnotationNode::number());
        let changes = crate::differ::diff_column(&before, &after).unwrap();

        let stmt = dialect().render_modify_column("users", &before, &after, &changes);
        assert!(!stmt.has_sql());
        assert_eq!(stmt.invalid.len(), 1);
        assert_eq!(stmt.invalid[0].field, "base_type");
        assert!(stmt.invalid[0].message.contains("expand"));
    }

    #[test]
    fn test_bare_rename_is_supported_with_warning() {
        let before = resolve("email", &AnnotationNode::string());
        let after = resolve("new_field", &AnnotationNode::string());
        let changes = ColumnChanges {
            renamed_from: Some("email".into()),
            ..ColumnChanges::default()
        };

        let stmt = dialect().render_modify_column("users", &before, &after, &changes);
        assert_eq!(
            stmt.sql,
            "ALTER TABLE \"users\" RENAME COLUMN \"email\" TO \"new_field\";"
        );
        assert_eq!(stmt.warnings.len(), 1);
        assert!(stmt.invalid.is_empty());
    }

    #[test]
    fn test_add_unique_column_uses_index() {
        let column = resolve("handle", &AnnotationNode::string().unique());
        let stmt = dialect().render_add_column(&column);

        assert!(stmt.sql.contains("ALTER TABLE \"users\" ADD COLUMN \"handle\" TEXT NOT NULL;"));
        assert!(stmt.sql.contains(
            "CREATE UNIQUE INDEX \"users_handle_unique\" ON \"users\" (\"handle\");"
        ));
    }

    #[test]
    fn test_add_auto_increment_column_is_invalid() {
        let column = resolve("id", &AnnotationNode::number().primary().generated());
        let stmt = dialect().render_add_column(&column);
        assert!(!stmt.has_sql());
        assert_eq!(stmt.invalid[0].field, "generated");
    }

    #[test]
    fn test_render_index_if_not_exists() {
        let index = IndexDefinition::new("users", vec!["email".into()]);
        assert_eq!(
            dialect().render_index(&index),
            "CREATE INDEX IF NOT EXISTS \"idx_users_email\" ON \"users\" (\"email\");"
        );
    }
}
