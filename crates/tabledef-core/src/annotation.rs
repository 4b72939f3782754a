//! Annotation tree types.
//!
//! A column is described by a tree of composable wrapper annotations around
//! a scalar leaf: nullable unions, `Generated`, `Unique`, `Primary`,
//! `Sized`, `Text`, `Default`, split select/insert/update shapes, and
//! foreign-key references. A front end (macros, a builder API, or a small
//! DSL parser) produces these trees; [`resolve`](crate::resolve::resolve)
//! flattens them into [`ColumnDefinition`](crate::schema::ColumnDefinition)s.

use serde::{Deserialize, Serialize};

/// Scalar leaf types an annotation tree can bottom out at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Character data.
    String,
    /// Numeric data (mapped to an integer type by dialects).
    Number,
    /// Boolean data.
    Boolean,
    /// Date/time data.
    Date,
    /// The update-forbidden sentinel. Only valid as a split update shape.
    Never,
    /// A type the front end could not classify; dialects fall back to text.
    Opaque(String),
}

/// A default value carried by a `Default` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultExpr {
    /// A quoted string literal. Quotes are already stripped.
    Str(String),
    /// A bare expression such as `now()`, kept verbatim. Dialects recognize
    /// well-known expressions and translate them natively.
    Expr(String),
}

impl DefaultExpr {
    /// Creates a string-literal default.
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Creates a verbatim expression default.
    #[must_use]
    pub fn expr(value: impl Into<String>) -> Self {
        Self::Expr(value.into())
    }
}

/// One node of a parsed annotation tree.
///
/// Each wrapper carries exactly one child, except [`Split`](Self::Split)
/// (three shapes) and [`Reference`](Self::Reference) (target plus key type),
/// so resolution strips one layer per step and terminates at a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationNode {
    /// A scalar leaf.
    Leaf(ScalarType),
    /// A two-member union with null/undefined; the child is the non-null member.
    Nullable(Box<AnnotationNode>),
    /// A database-generated column.
    Generated(Box<AnnotationNode>),
    /// A column carrying a UNIQUE constraint.
    Unique(Box<AnnotationNode>),
    /// A column carrying a PRIMARY KEY constraint.
    Primary(Box<AnnotationNode>),
    /// Bounded-length text. Terminal for type purposes.
    Sized(Box<AnnotationNode>, u32),
    /// Unbounded large text. Terminal for type purposes.
    Text(Box<AnnotationNode>),
    /// A column default.
    Default(Box<AnnotationNode>, DefaultExpr),
    /// Diverging select/insert/update representations.
    Split {
        /// The shape read back by queries; drives the column's base type.
        select: Box<AnnotationNode>,
        /// The shape accepted on insert; probed for nullability only.
        insert: Box<AnnotationNode>,
        /// The shape accepted on update; probed for nullability and the
        /// `Never` sentinel.
        update: Box<AnnotationNode>,
    },
    /// A foreign-key reference. The target is validated against the
    /// registry at finalization, not during resolution.
    Reference {
        /// Referenced table, as the front end spelled it.
        table: String,
        /// Referenced column.
        column: String,
        /// The key type used for the column itself.
        key: Box<AnnotationNode>,
    },
}

impl AnnotationNode {
    /// A string leaf.
    #[must_use]
    pub const fn string() -> Self {
        Self::Leaf(ScalarType::String)
    }

    /// A number leaf.
    #[must_use]
    pub const fn number() -> Self {
        Self::Leaf(ScalarType::Number)
    }

    /// A boolean leaf.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::Leaf(ScalarType::Boolean)
    }

    /// A date leaf.
    #[must_use]
    pub const fn date() -> Self {
        Self::Leaf(ScalarType::Date)
    }

    /// The `never` sentinel leaf.
    #[must_use]
    pub const fn never() -> Self {
        Self::Leaf(ScalarType::Never)
    }

    /// An opaque leaf the front end could not classify.
    #[must_use]
    pub fn opaque(text: impl Into<String>) -> Self {
        Self::Leaf(ScalarType::Opaque(text.into()))
    }

    /// Wraps `self` in a nullable union.
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// Marks the column as database-generated.
    #[must_use]
    pub fn generated(self) -> Self {
        Self::Generated(Box::new(self))
    }

    /// Marks the column as UNIQUE.
    #[must_use]
    pub fn unique(self) -> Self {
        Self::Unique(Box::new(self))
    }

    /// Marks the column as the PRIMARY KEY.
    #[must_use]
    pub fn primary(self) -> Self {
        Self::Primary(Box::new(self))
    }

    /// Bounds the column to `size` characters.
    #[must_use]
    pub fn sized(self, size: u32) -> Self {
        Self::Sized(Box::new(self), size)
    }

    /// Marks the column as unbounded large text.
    #[must_use]
    pub fn text(self) -> Self {
        Self::Text(Box::new(self))
    }

    /// Attaches a default value.
    #[must_use]
    pub fn with_default(self, default: DefaultExpr) -> Self {
        Self::Default(Box::new(self), default)
    }

    /// Builds a split select/insert/update shape.
    #[must_use]
    pub fn split(select: Self, insert: Self, update: Self) -> Self {
        Self::Split {
            select: Box::new(select),
            insert: Box::new(insert),
            update: Box::new(update),
        }
    }

    /// Builds a foreign-key reference with `key` as the column's own type.
    #[must_use]
    pub fn reference(table: impl Into<String>, column: impl Into<String>, key: Self) -> Self {
        Self::Reference {
            table: table.into(),
            column: column.into(),
            key: Box::new(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_nest_outside_in() {
        let node = AnnotationNode::number().primary().generated();
        assert_eq!(
            node,
            AnnotationNode::Generated(Box::new(AnnotationNode::Primary(Box::new(
                AnnotationNode::Leaf(ScalarType::Number)
            ))))
        );
    }

    #[test]
    fn test_reference_builder() {
        let node = AnnotationNode::reference("UsersTable", "id", AnnotationNode::number());
        match node {
            AnnotationNode::Reference { table, column, key } => {
                assert_eq!(table, "UsersTable");
                assert_eq!(column, "id");
                assert_eq!(*key, AnnotationNode::number());
            }
            other => panic!("expected Reference, got {other:?}"),
        }
    }
}
