//! # tabledef-core
//!
//! Canonical schema model and annotation resolution for `tabledef`.
//!
//! A table description reaches this crate as a name plus an ordered list of
//! `(column name, annotation tree)` pairs; parsing host-language source
//! into [`annotation::AnnotationNode`]s is the front end's job. This crate:
//!
//! - resolves each annotation tree into a flat
//!   [`schema::ColumnDefinition`] (one recursive descent, pure, no I/O);
//! - collects tables into an ordered, validated
//!   [`registry::SchemaRegistry`];
//! - derives storage identifiers (`TeamMembersTable` → `team_members`).
//!
//! Diffing registries and rendering SQL live in `tabledef-migrate`.
//!
//! ```rust
//! use tabledef_core::prelude::*;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register_table(
//!     "UsersTable",
//!     vec![
//!         ("id", AnnotationNode::number().primary().generated()),
//!         ("email", AnnotationNode::string().sized(255).unique()),
//!         ("role", AnnotationNode::string().with_default(DefaultExpr::str("member"))),
//!     ],
//! )?;
//! let registry = registry.finalize()?;
//! assert_eq!(registry.tables()[0].name, "users");
//! # Ok::<(), tabledef_core::SchemaError>(())
//! ```

pub mod annotation;
pub mod case;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod schema;

pub use error::{Result, SchemaError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::annotation::{AnnotationNode, DefaultExpr, ScalarType};
    pub use crate::error::{Result, SchemaError};
    pub use crate::registry::SchemaRegistry;
    pub use crate::resolve::resolve;
    pub use crate::schema::{ColumnDefinition, ColumnShape, IndexDefinition, TableDefinition};
}
