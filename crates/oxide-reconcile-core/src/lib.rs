//! Declarative schema reconciliation for PostgreSQL.
//!
//! `oxide-reconcile-core` holds the I/O-free half of the reconciliation
//! engine:
//!
//! - **Field model** - [`Field`], [`Entity`] and the [`Model`] trait describe
//!   the columns an application expects.
//! - **Type mapping** - [`DataType`] translates between declared names,
//!   catalog spellings and host-language aliases.
//! - **Naming** - [`to_table_identifier`] turns `UserPayment` into
//!   `user_payments`.
//! - **Diff** - [`classify`] marks each declared field as new, changed or
//!   unchanged against the live columns.
//! - **DDL** - [`DdlDialect`], implemented by [`PostgresDdl`], renders `CREATE TABLE`, `ADD COLUMN`,
//!   `ALTER COLUMN` and `CREATE INDEX` statements.
//!
//! Reading the catalog and executing statements lives in the
//! `oxide-reconcile` crate.
//!
//! # Example
//!
//! ```rust
//! use oxide_reconcile_core::{DataType, DdlDialect, Field, PostgresDdl, classify};
//!
//! let declared = vec![
//!     Field::new("id", DataType::Int),
//!     Field::new("balance", DataType::Numeric).size("6,2").nullable(),
//! ];
//! let live = vec![Field::new("id", DataType::Int)];
//!
//! let ddl = PostgresDdl::new();
//! let statements: Vec<String> = classify(&declared, &live)
//!     .iter()
//!     .flat_map(|change| ddl.update_statements("users", change))
//!     .collect();
//!
//! assert_eq!(
//!     statements,
//!     ["ALTER TABLE \"users\" ADD COLUMN \"balance\" numeric(6,2)"]
//! );
//! ```

pub mod ddl;
pub mod diff;
pub mod error;
pub mod field;
pub mod naming;
pub mod types;

pub use ddl::{DdlDialect, PostgresDdl};
pub use diff::{Attribute, ChangedField, FieldStatus, classify};
pub use error::{Result, SchemaError};
pub use field::{Entity, Field, Model, validate_fields};
pub use naming::to_table_identifier;
pub use types::{DataType, catalog_to_portable, host_to_portable, portable_to_catalog};
