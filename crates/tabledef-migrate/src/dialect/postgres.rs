//! PostgreSQL dialect.
//!
//! The rich-ALTER variant: columns can change type, nullability, and
//! defaults in place, constraints are named and added or dropped after the
//! fact, and table drops cascade.

use tabledef_core::annotation::{DefaultExpr, ScalarType};
use tabledef_core::case::snake_case;
use tabledef_core::prelude::{ColumnDefinition, IndexDefinition, TableDefinition};

use crate::entry::{Change, ColumnChanges};
use crate::statement::MigrationStatement;

use super::{SchemaDialect, RENAME_WARNING};

/// PostgreSQL schema dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn scalar_type_name(scalar: &ScalarType) -> &'static str {
        match scalar {
            ScalarType::String => "varchar(255)",
            ScalarType::Number => "integer",
            ScalarType::Date => "timestamp",
            ScalarType::Boolean => "boolean",
            ScalarType::Never | ScalarType::Opaque(_) => "text",
        }
    }

    fn default_value_sql(default: &DefaultExpr) -> String {
        match default {
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
                let name = format!(
                    "{}_{ref_table}_{}_fk",
                    snake_case(&column.name),
                    snake_case(ref_column)
                );
                constraints.push(format!(
                    "CONSTRAINT \"{name}\" FOREIGN KEY(\"{}\") REFERENCES \"{ref_table}\"(\"{ref_column}\")",
                    column.name
                ));
            }
        }
        constraints
    }
}

impl SchemaDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn preamble(&self) -> Option<String> {
        None
    }

    fn type_name(&self, column: &ColumnDefinition) -> String {
        if column.is_large_text {
            return "text".to_string();
        }
        if let Some(size) = column.size_bound {
            if column.base_type == ScalarType::String {
                return format!("varchar({size})");
            }
            return "text".to_string();
        }
        Self::scalar_type_name(&column.base_type).to_string()
    }

    fn supports_alter_column(&self) -> bool {
        true
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

        if column.is_generated {
            fragment.push_str("serial NOT NULL");
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

        if column.is_primary_key {
            constraints.push(format!(
                "CONSTRAINT \"{}\" PRIMARY KEY (\"{}\")",
                self.constraint_name(&column.table_name, &column.name, "primary"),
                column.name
            ));
        }
        if column.is_unique && !column.is_primary_key {
            constraints.push(format!(
                "CONSTRAINT \"{}\" UNIQUE (\"{}\")",
                self.constraint_name(&column.table_name, &column.name, "unique"),
                column.name
            ));
        }

        fragment
    }

    fn render_drop(&self, table: &str, if_exists: bool) -> MigrationStatement {
        let exists = if if_exists { " IF EXISTS" } else { "" };
        MigrationStatement::from_sql(format!("DROP TABLE{exists} \"{table}\" CASCADE;"))
    }

    fn render_add_column(&self, column: &ColumnDefinition) -> MigrationStatement {
        let mut constraints = Vec::new();
        let fragment = self.column_fragment(column, &mut constraints);

        let mut clauses = vec![format!("ADD COLUMN {fragment}")];
        clauses.extend(constraints.into_iter().map(|c| format!("ADD {c}")));

        MigrationStatement::from_sql(format!(
            "ALTER TABLE \"{}\" {};",
            column.table_name,
            clauses.join(",\n  ")
        ))
    }

    fn render_modify_column(
        &self,
        table: &str,
        before: &ColumnDefinition,
        after: &ColumnDefinition,
        changes: &ColumnChanges,
    ) -> MigrationStatement {
        let mut statement = MigrationStatement::empty();
        let mut column_clauses: Vec<String> = Vec::new();
        let mut constraint_clauses: Vec<String> = Vec::new();

        // A size or large-text transition is a type change like any other;
        // the mapping on the new definition already folds all three in.
        let type_changed = changes.base_type.is_some()
            || changes.size_bound.is_some()
            || changes.large_text.is_some();
        if type_changed {
            column_clauses.push(format!("SET DATA TYPE {}", self.type_name(after)));
        }

        if let Some(nullable) = changes.nullable {
            column_clauses.push(if nullable {
                "DROP NOT NULL".to_string()
            } else {
                "SET NOT NULL".to_string()
            });
        }

        match &changes.default {
            Some(Change::Added(value) | Change::Altered { to: value, .. }) => {
                column_clauses.push(format!("SET DEFAULT {}", Self::default_value_sql(value)));
            }
            Some(Change::Removed(_)) => column_clauses.push("DROP DEFAULT".to_string()),
            None => {}
        }

        match changes.unique {
            Some(true) => constraint_clauses.push(format!(
                "ADD CONSTRAINT \"{}\" UNIQUE (\"{}\")",
                self.constraint_name(table, &before.name, "unique"),
                before.name
            )),
            Some(false) => constraint_clauses.push(format!(
                "DROP CONSTRAINT \"{}\"",
                self.constraint_name(table, &before.name, "unique")
            )),
            None => {}
        }

        match changes.primary_key {
            Some(true) => constraint_clauses.push(format!(
                "ADD CONSTRAINT \"{}\" PRIMARY KEY (\"{}\")",
                self.constraint_name(table, &before.name, "primary"),
                before.name
            )),
            Some(false) => constraint_clauses.push(format!(
                "DROP CONSTRAINT \"{}\"",
                self.constraint_name(table, &before.name, "primary")
            )),
            None => {}
        }

        if changes.generated.is_some() {
            statement = statement.with_invalid(
                "generated",
                "changing a generated column in place is not supported; \
                 add a replacement column, migrate data, then drop the old one",
            );
        }

        let mut clauses: Vec<String> = column_clauses
            .into_iter()
            .map(|clause| format!("ALTER COLUMN \"{}\" {clause}", before.name))
            .collect();
        clauses.extend(constraint_clauses);

        let mut statements = Vec::new();
        if !clauses.is_empty() {
            statements.push(format!("ALTER TABLE \"{table}\" {};", clauses.join(",\n  ")));
        }
        if let Some(old_name) = &changes.renamed_from {
            statements.push(format!(
                "ALTER TABLE \"{table}\" RENAME COLUMN \"{old_name}\" TO \"{}\";",
                after.name
            ));
            statement = statement.with_warning(RENAME_WARNING);
        }

        statement.sql = statements.join("\n");
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
            "{kind} \"{}\" ON \"{}\"({});",
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

    fn dialect() -> PostgresDialect {
        PostgresDialect::new()
    }

    fn users_table() -> TableDefinition {
        let mut registry = SchemaRegistry::new();
        registry
            .register_table(
                "UsersTable",
                vec![
                    ("id", AnnotationNode::number().primary().generated()),
                    ("email", AnnotationNode::string().sized(255).unique()),
                    (
                        "role",
                        AnnotationNode::string().with_default(DefaultExpr::str("member")),
                    ),
                ],
            )
            .unwrap();
        registry.finalize().unwrap().tables()[0].clone()
    }

    #[test]
    fn test_render_users_table() {
        let sql = dialect().render_table(&users_table());

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"users\" ("));
        assert!(sql.contains("\"id\" serial NOT NULL"));
        assert!(sql.contains("\"email\" varchar(255) NOT NULL"));
        assert!(sql.contains("\"role\" varchar(255) DEFAULT 'member' NOT NULL"));
        assert!(sql.contains("CONSTRAINT \"users_id_primary\" PRIMARY KEY (\"id\")"));
        assert!(sql.contains("CONSTRAINT \"users_email_unique\" UNIQUE (\"email\")"));
    }

    #[test]
    fn test_render_table_with_foreign_key() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_table(
                "TeamsTable",
                vec![("id", AnnotationNode::number().primary().generated())],
            )
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
        assert!(sql.contains(
            "CONSTRAINT \"team_id_teams_id_fk\" FOREIGN KEY(\"teamId\") REFERENCES \"teams\"(\"id\")"
        ));
    }

    #[test]
    fn test_large_text_and_date_types() {
        let column = |node: AnnotationNode, name: &str| {
            tabledef_core::resolve::resolve("users", name, &node).unwrap()
        };
        let d = dialect();

        assert_eq!(d.type_name(&column(AnnotationNode::string().text(), "bio")), "text");
        assert_eq!(d.type_name(&column(AnnotationNode::date(), "created")), "timestamp");
        assert_eq!(d.type_name(&column(AnnotationNode::boolean(), "active")), "boolean");
    }

    #[test]
    fn test_render_drop_cascades() {
        let stmt = dialect().render_drop("users", true);
        assert_eq!(stmt.sql, "DROP TABLE IF EXISTS \"users\" CASCADE;");

        let hard = dialect().render_drop("users", false);
        assert_eq!(hard.sql, "DROP TABLE \"users\" CASCADE;");
    }

    #[test]
    fn test_render_add_column_with_unique_constraint() {
        let column = tabledef_core::resolve::resolve(
            "users",
            "handle",
            &AnnotationNode::string().sized(64).unique(),
        )
        .unwrap();

        let stmt = dialect().render_add_column(&column);
        assert!(stmt.sql.contains("ALTER TABLE \"users\" ADD COLUMN \"handle\" varchar(64)"));
        assert!(stmt.sql.contains("ADD CONSTRAINT \"users_handle_unique\" UNIQUE (\"handle\")"));
    }

    #[test]
    fn test_modify_type_and_nullability() {
        let before = tabledef_core::resolve::resolve("users", "age", &AnnotationNode::string().nullable()).unwrap();
        let after = tabledef_core::resolve::resolve("users", "age", &AnnotationNode::number()).unwrap();
        let changes = crate::differ::diff_column(&before, &after).unwrap();

        let stmt = dialect().render_modify_column("users", &before, &after, &changes);
        assert!(stmt.sql.contains("ALTER COLUMN \"age\" SET DATA TYPE integer"));
        assert!(stmt.sql.contains("ALTER COLUMN \"age\" SET NOT NULL"));
        assert!(stmt.invalid.is_empty());
    }

    #[test]
    fn test_modify_default_removed() {
        let before = tabledef_core::resolve::resolve(
            "users",
            "role",
            &AnnotationNode::string().with_default(DefaultExpr::str("member")),
        )
        .unwrap();
        let after = tabledef_core::resolve::resolve("users", "role", &AnnotationNode::string()).unwrap();
        let changes = crate::differ::diff_column(&before, &after).unwrap();

        let stmt = dialect().render_modify_column("users", &before, &after, &changes);
        assert!(stmt.sql.contains("ALTER COLUMN \"role\" DROP DEFAULT"));
    }

    #[test]
    fn test_bare_rename_carries_warning() {
        let before = tabledef_core::resolve::resolve("users", "email", &AnnotationNode::string()).unwrap();
        let after = tabledef_core::resolve::resolve("users", "new_field", &AnnotationNode::string()).unwrap();
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
        assert!(stmt.warnings[0].contains("expand"));
    }

    #[test]
    fn test_rename_with_new_constraint_renders_both_statements() {
        let before = tabledef_core::resolve::resolve("users", "email", &AnnotationNode::string()).unwrap();
        let after = tabledef_core::resolve::resolve(
            "users",
            "contact_email",
            &AnnotationNode::string().unique(),
        )
        .unwrap();
        let mut changes = crate::differ::diff_column(&before, &after).unwrap();
        changes.renamed_from = Some("email".into());

        let stmt = dialect().render_modify_column("users", &before, &after, &changes);
        assert!(stmt.sql.contains("ADD CONSTRAINT \"users_email_unique\" UNIQUE (\"email\")"));
        assert!(stmt.sql.contains("RENAME COLUMN \"email\" TO \"contact_email\""));
        assert_eq!(stmt.warnings.len(), 1);
    }

    #[test]
    fn test_render_index() {
        let index = IndexDefinition::new("users", vec!["teamId".into(), "email".into()]).unique();
        assert_eq!(
            dialect().render_index(&index),
            "CREATE UNIQUE INDEX \"idx_users_team_id_email\" ON \"users\"(\"teamId\", \"email\");"
        );
    }
}
