//! # tabledef-migrate
//!
//! Schema diffing and dialect-aware DDL generation for `tabledef`.
//!
//! Given registries built by `tabledef-core`, this crate:
//!
//! - computes ordered change entries between two registry snapshots,
//!   reconciling removed+added column pairs that represent renames;
//! - renders full schemas, resets, and reversible up/down migrations
//!   through a capability-polymorphic [`dialect::SchemaDialect`]
//!   (PostgreSQL and SQLite variants);
//! - surfaces operations a dialect cannot express as `invalid` notes and
//!   risky-but-legal operations as `warnings`, never silently dropping
//!   either.
//!
//! Everything is synchronous and pure; no SQL is executed here.
//!
//! ```rust
//! use tabledef_core::prelude::*;
//! use tabledef_migrate::prelude::*;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register_table(
//!     "UsersTable",
//!     vec![("id", AnnotationNode::number().primary().generated())],
//! )?;
//! let registry = registry.finalize()?;
//!
//! let ddl = build_full_schema(&registry, &SqliteDialect::new())?;
//! assert_eq!(ddl[0], "PRAGMA foreign_keys = ON;");
//! # Ok::<(), tabledef_migrate::MigrateError>(())
//! ```

pub mod dialect;
pub mod differ;
pub mod entry;
pub mod error;
pub mod migration;
pub mod reconcile;
pub mod snapshot;
pub mod statement;

pub use error::{MigrateError, Result};
pub use migration::{build_full_schema, build_migration, build_reset, validate};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{PostgresDialect, SchemaDialect, SqliteDialect};
    pub use crate::differ::diff;
    pub use crate::entry::{Change, ChangeEntry, ColumnChanges};
    pub use crate::error::{MigrateError, Result};
    pub use crate::migration::{build_full_schema, build_migration, build_reset, validate};
    pub use crate::reconcile::reconcile_renames;
    pub use crate::statement::{InvalidNote, MigrationPlan, MigrationStatement};
}
