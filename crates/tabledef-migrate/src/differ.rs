//! Structural schema diffing.
//!
//! [`diff`] compares two registries and produces ordered change entries:
//! removed tables first (in old-registry order), then added and modified
//! tables in new-registry order, with each still-present table's columns
//! diffed by name in declaration order. The naive per-table column diff is
//! then passed through [`reconcile_renames`](crate::reconcile::reconcile_renames)
//! so a renamed column surfaces as one modified entry rather than a
//! data-destroying drop+add pair.
//!
//! Down-direction statements come from calling `diff` with operands
//! swapped, never from inverting the up entries.

use tracing::debug;

use tabledef_core::prelude::{ColumnDefinition, SchemaRegistry, TableDefinition};

use crate::entry::{Change, ChangeEntry, ColumnChanges};
use crate::reconcile::reconcile_renames;

/// Computes the change entries that transform `old` into `new`.
#[must_use]
pub fn diff(old: &SchemaRegistry, new: &SchemaRegistry) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();

    for table in old.tables() {
        if new.get_table(&table.name).is_none() {
            entries.push(ChangeEntry::TableRemoved(table.name.clone()));
        }
    }

    for table in new.tables() {
        match old.get_table(&table.name) {
            None => entries.push(ChangeEntry::TableAdded(table.clone())),
            Some(before) => {
                entries.extend(reconcile_renames(diff_table(before, table)));
            }
        }
    }

    debug!(entries = entries.len(), "schema diff computed");
    entries
}

/// Naive per-table column diff: matches columns by name, classifying each
/// as added, removed, or modified. Rename pairs still appear as
/// removed+added here; reconciliation is a separate pass.
#[must_use]
pub fn diff_table(before: &TableDefinition, after: &TableDefinition) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();

    for column in &before.columns {
        if after.get_column(&column.name).is_none() {
            entries.push(ChangeEntry::ColumnRemoved(column.clone()));
        }
    }

    for column in &after.columns {
        match before.get_column(&column.name) {
            None => entries.push(ChangeEntry::ColumnAdded(column.clone())),
            Some(old_column) => {
                if let Some(changes) = diff_column(old_column, column) {
                    entries.push(ChangeEntry::ColumnModified {
                        table: after.name.clone(),
                        before: old_column.clone(),
                        after: column.clone(),
                        changes,
                    });
                }
            }
        }
    }

    entries
}

/// Compares two revisions of one column, ignoring its name.
///
/// Returns `None` when nothing changed.
#[must_use]
pub fn diff_column(before: &ColumnDefinition, after: &ColumnDefinition) -> Option<ColumnChanges> {
    let changes = ColumnChanges {
        renamed_from: None,
        base_type: (before.base_type != after.base_type).then(|| Change::Altered {
            from: before.base_type.clone(),
            to: after.base_type.clone(),
        }),
        nullable: (before.nullable != after.nullable).then_some(after.nullable),
        size_bound: change_of(before.size_bound.as_ref(), after.size_bound.as_ref()),
        large_text: (before.is_large_text != after.is_large_text).then_some(after.is_large_text),
        default: change_of(before.default_value.as_ref(), after.default_value.as_ref()),
        unique: (before.is_unique != after.is_unique).then_some(after.is_unique),
        primary_key: (before.is_primary_key != after.is_primary_key)
            .then_some(after.is_primary_key),
        generated: (before.is_generated != after.is_generated).then_some(after.is_generated),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes)
    }
}

fn change_of<T: Clone + PartialEq>(before: Option<&T>, after: Option<&T>) -> Option<Change<T>> {
    match (before, after) {
        (None, Some(added)) => Some(Change::Added(added.clone())),
        (Some(removed), None) => Some(Change::Removed(removed.clone())),
        (Some(from), Some(to)) if from != to => Some(Change::Altered {
            from: from.clone(),
            to: to.clone(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabledef_core::prelude::{AnnotationNode, DefaultExpr, ScalarType};

    fn registry(tables: Vec<(&str, Vec<(&str, AnnotationNode)>)>) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        for (ident, columns) in tables {
            registry.register_table(ident, columns).unwrap();
        }
        registry.finalize().unwrap()
    }

    fn users_v1() -> Vec<(&'static str, AnnotationNode)> {
        vec![
            ("id", AnnotationNode::number().primary().generated()),
            ("email", AnnotationNode::string().sized(255).unique()),
        ]
    }

    #[test]
    fn test_diff_identity_is_empty() {
        let a = registry(vec![("UsersTable", users_v1())]);
        assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn test_table_added_and_removed() {
        let old = registry(vec![("UsersTable", users_v1())]);
        let new = registry(vec![("TeamsTable", users_v1())]);

        let entries = diff(&old, &new);
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], ChangeEntry::TableRemoved(name) if name == "users"));
        assert!(matches!(&entries[1], ChangeEntry::TableAdded(t) if t.name == "teams"));
    }

    #[test]
    fn test_column_added() {
        let old = registry(vec![("UsersTable", users_v1())]);
        let mut columns = users_v1();
        columns.push(("role", AnnotationNode::string()));
        let new = registry(vec![("UsersTable", columns)]);

        let entries = diff(&old, &new);
        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], ChangeEntry::ColumnAdded(c) if c.name == "role"));
    }

    #[test]
    fn test_column_type_change() {
        let old = registry(vec![("UsersTable", vec![("age", AnnotationNode::string())])]);
        let new = registry(vec![("UsersTable", vec![("age", AnnotationNode::number())])]);

        let entries = diff(&old, &new);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            ChangeEntry::ColumnModified { changes, .. } => {
                assert_eq!(
                    changes.base_type,
                    Some(Change::Altered {
                        from: ScalarType::String,
                        to: ScalarType::Number,
                    })
                );
                assert!(changes.renamed_from.is_none());
            }
            other => panic!("expected ColumnModified, got {other:?}"),
        }
    }

    #[test]
    fn test_default_added_and_removed_markers() {
        let old = registry(vec![("UsersTable", vec![("role", AnnotationNode::string())])]);
        let new = registry(vec![(
            "UsersTable",
            vec![(
                "role",
                AnnotationNode::string().with_default(DefaultExpr::str("member")),
            )],
        )]);

        let up = diff(&old, &new);
        match &up[0] {
            ChangeEntry::ColumnModified { changes, .. } => {
                assert_eq!(changes.default, Some(Change::Added(DefaultExpr::str("member"))));
            }
            other => panic!("expected ColumnModified, got {other:?}"),
        }

        let down = diff(&new, &old);
        match &down[0] {
            ChangeEntry::ColumnModified { changes, .. } => {
                assert_eq!(changes.default, Some(Change::Removed(DefaultExpr::str("member"))));
            }
            other => panic!("expected ColumnModified, got {other:?}"),
        }
    }

    #[test]
    fn test_up_and_down_are_structural_mirrors() {
        let old = registry(vec![
            ("UsersTable", users_v1()),
            ("LegacyTable", vec![("id", AnnotationNode::number())]),
        ]);
        let mut columns = users_v1();
        columns.push(("role", AnnotationNode::string()));
        let new = registry(vec![
            ("UsersTable", columns),
            ("TeamsTable", vec![("id", AnnotationNode::number())]),
        ]);

        let up = diff(&old, &new);
        let down = diff(&new, &old);

        let count = |entries: &[ChangeEntry], pick: fn(&ChangeEntry) -> bool| {
            entries.iter().filter(|e| pick(e)).count()
        };

        assert_eq!(
            count(&up, |e| matches!(e, ChangeEntry::TableAdded(_))),
            count(&down, |e| matches!(e, ChangeEntry::TableRemoved(_)))
        );
        assert_eq!(
            count(&up, |e| matches!(e, ChangeEntry::TableRemoved(_))),
            count(&down, |e| matches!(e, ChangeEntry::TableAdded(_)))
        );
        assert_eq!(
            count(&up, |e| matches!(e, ChangeEntry::ColumnAdded(_))),
            count(&down, |e| matches!(e, ChangeEntry::ColumnRemoved(_)))
        );
    }

    #[test]
    fn test_diff_preserves_table_order() {
        let old = registry(vec![]);
        let new = registry(vec![
            ("ZebrasTable", users_v1()),
            ("AardvarksTable", users_v1()),
        ]);

        let entries = diff(&old, &new);
        let names: Vec<&str> = entries
            .iter()
            .map(|e| match e {
                ChangeEntry::TableAdded(t) => t.name.as_str(),
                other => panic!("expected TableAdded, got {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["zebras", "aardvarks"]);
    }
}
