//! Annotation resolution.
//!
//! A single recursive descent over an [`AnnotationNode`] accumulates facts
//! onto a [`ColumnDefinition`] as it unwraps. Every wrapper strips exactly
//! one layer, so termination is bounded by tree depth; resolving an
//! already-terminal leaf is a no-op beyond setting the base type.

use crate::annotation::{AnnotationNode, ScalarType};
use crate::error::{Result, SchemaError};
use crate::schema::{ColumnDefinition, ColumnShape};

/// Resolves one column's annotation tree into a flat definition.
///
/// Reference targets are recorded but not checked here; resolution runs
/// before all tables are known, so target validation belongs to registry
/// finalization.
///
/// # Errors
///
/// Returns [`SchemaError::Construction`] for contradictory nesting: an
/// explicit default on a generated column, or the `never` sentinel outside
/// an update shape.
pub fn resolve(table_name: &str, column_name: &str, node: &AnnotationNode) -> Result<ColumnDefinition> {
    let mut column = ColumnDefinition::new(table_name, column_name, ScalarType::Opaque(String::new()));
    descend(node, &mut column)?;

    if column.is_generated {
        if column.default_value.is_some() {
            return Err(construction(
                &column,
                "a generated column cannot carry an explicit default",
            ));
        }
        // Generated columns are implicitly non-nullable.
        column.nullable = false;
    }

    Ok(column)
}

fn descend(node: &AnnotationNode, column: &mut ColumnDefinition) -> Result<()> {
    match node {
        AnnotationNode::Leaf(scalar) => {
            if *scalar == ScalarType::Never {
                return Err(construction(
                    column,
                    "the never sentinel is only valid as a split update shape",
                ));
            }
            column.base_type = scalar.clone();
            Ok(())
        }
        AnnotationNode::Nullable(inner) => {
            column.nullable = true;
            descend(inner, column)
        }
        AnnotationNode::Generated(inner) => {
            column.is_generated = true;
            descend(inner, column)
        }
        AnnotationNode::Unique(inner) => {
            column.is_unique = true;
            descend(inner, column)
        }
        AnnotationNode::Primary(inner) => {
            column.is_primary_key = true;
            descend(inner, column)
        }
        AnnotationNode::Sized(inner, size) => {
            // Size and base type resolve together; no wrapper semantics
            // apply inside a sized terminal.
            column.size_bound = Some(*size);
            column.base_type = leaf_scalar(inner);
            Ok(())
        }
        AnnotationNode::Text(inner) => {
            column.is_large_text = true;
            column.base_type = leaf_scalar(inner);
            Ok(())
        }
        AnnotationNode::Default(inner, default) => {
            // The outermost default wins; one hoisted from a split select
            // shape never overrides it.
            if column.default_value.is_none() {
                column.default_value = Some(default.clone());
            }
            descend(inner, column)
        }
        AnnotationNode::Split { select, insert, update } => {
            descend(select, column)?;

            let insert_shape = probe_shape(insert);
            let update_shape = probe_shape(update);

            column.nullable = column.nullable || insert_shape.nullable || update_shape.nullable;
            column.is_updateable = update_shape.base_type != ScalarType::Never;
            column.insert_shape = Some(insert_shape);
            column.update_shape = Some(update_shape);
            Ok(())
        }
        AnnotationNode::Reference { table, column: target_column, key } => {
            column.references_table = Some(table.clone());
            column.references_column = Some(target_column.clone());
            descend(key, column)
        }
    }
}

/// Peels a terminal subtree down to its scalar without applying wrapper
/// semantics. Used for the inside of `Sized`/`Text`.
fn leaf_scalar(node: &AnnotationNode) -> ScalarType {
    match node {
        AnnotationNode::Leaf(scalar) => scalar.clone(),
        AnnotationNode::Nullable(inner)
        | AnnotationNode::Generated(inner)
        | AnnotationNode::Unique(inner)
        | AnnotationNode::Primary(inner)
        | AnnotationNode::Sized(inner, _)
        | AnnotationNode::Text(inner)
        | AnnotationNode::Default(inner, _) => leaf_scalar(inner),
        AnnotationNode::Split { select, .. } => leaf_scalar(select),
        AnnotationNode::Reference { key, .. } => leaf_scalar(key),
    }
}

/// Resolves a split insert/update subtree only far enough to learn its
/// scalar and nullability.
fn probe_shape(node: &AnnotationNode) -> ColumnShape {
    let mut shape = ColumnShape {
        base_type: leaf_scalar(node),
        nullable: false,
    };
    probe_nullability(node, &mut shape);
    shape
}

fn probe_nullability(node: &AnnotationNode, shape: &mut ColumnShape) {
    match node {
        AnnotationNode::Leaf(_) => {}
        AnnotationNode::Nullable(inner) => {
            shape.nullable = true;
            probe_nullability(inner, shape);
        }
        AnnotationNode::Generated(inner)
        | AnnotationNode::Unique(inner)
        | AnnotationNode::Primary(inner)
        | AnnotationNode::Sized(inner, _)
        | AnnotationNode::Text(inner)
        | AnnotationNode::Default(inner, _) => probe_nullability(inner, shape),
        AnnotationNode::Split { select, .. } => probe_nullability(select, shape),
        AnnotationNode::Reference { key, .. } => probe_nullability(key, shape),
    }
}

fn construction(column: &ColumnDefinition, message: &str) -> SchemaError {
    SchemaError::Construction {
        table: column.table_name.clone(),
        column: column.name.clone(),
        message: message.to_string(),
    }
}
