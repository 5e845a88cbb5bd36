//! Declarative schema reconciliation for PostgreSQL.
//!
//! `oxide-reconcile` compares the columns an application declares with the
//! columns a live table has, and issues the DDL that closes the gap:
//!
//! - a missing table is created,
//! - a missing column is added,
//! - a column whose type, size, default or nullability drifted is altered.
//!
//! Nothing is ever dropped. Columns that are live but no longer declared stay
//! untouched.
//!
//! # Architecture
//!
//! - **Catalog** - [`Catalog`](catalog::Catalog) is the database capability:
//!   catalog lookups and statement execution. Implemented for
//!   [`sqlx::PgConnection`].
//! - **Introspector** - reads `information_schema.columns` back into fields.
//! - **Reconciler** - drives one entity through existence check, diff and
//!   execution.
//! - **Source** - loads entity declarations from JSON files.
//!
//! The pure half (field model, type mapping, naming, diff and DDL) lives in
//! [`oxide_reconcile_core`]; its common types are re-exported from
//! [`prelude`].
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_reconcile::prelude::*;
//! use sqlx::postgres::PgPoolOptions;
//!
//! let pool = PgPoolOptions::new().connect("postgres://localhost/app").await?;
//!
//! let user = Entity::new(
//!     "User",
//!     vec![
//!         Field::new("id", DataType::Int).primary_key().auto_increment(),
//!         Field::new("email", DataType::Varchar).size("100").unique(),
//!         Field::new("balance", DataType::Numeric)
//!             .size("6,2")
//!             .nullable()
//!             .default_value("0"),
//!     ],
//! );
//!
//! let reconciler = Reconciler::new(ReconcileOptions::new().schema("public"));
//! reconciler.reconcile_in_transaction(&pool, &user).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Show the DDL that would run
//! oxide-reconcile plan --entities entities.json
//!
//! # Apply it, all-or-nothing
//! oxide-reconcile apply --entities entities.json --atomic
//!
//! # Show the table an entity maps to
//! oxide-reconcile table-name UserPayment
//! ```

pub mod catalog;
pub mod error;
pub mod introspect;
pub mod reconciler;
pub mod source;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{Catalog, ColumnRow};
    pub use crate::error::{ReconcileError, Result};
    pub use crate::introspect::{ExistenceCheck, Introspector};
    pub use crate::reconciler::{ReconcileOptions, Reconciler};
    pub use crate::source::EntityFile;
    pub use oxide_reconcile_core::{
        ChangedField, DataType, DdlDialect, Entity, Field, FieldStatus, Model, PostgresDdl,
        SchemaError, classify, to_table_identifier,
    };
}
