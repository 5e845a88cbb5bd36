//! Live schema introspection.
//!
//! Reads a table's columns from the catalog and rebuilds them as [`Field`]s so
//! the diff engine can compare them with the declaration.

use oxide_reconcile_core::{DataType, Field};
use tracing::debug;

use crate::catalog::{Catalog, ColumnRow};
use crate::error::{ReconcileError, Result};

/// How to decide whether a table exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExistenceCheck {
    /// Look the table up in `information_schema.tables`.
    #[default]
    Registry,
    /// Treat a table as existing when it reports at least one column. A table
    /// with zero columns is reported as missing.
    ColumnCount,
}

/// Reads live table metadata within one catalog schema.
#[derive(Debug, Clone)]
pub struct Introspector {
    schema: String,
    existence_check: ExistenceCheck,
}

impl Introspector {
    /// Creates an introspector for `schema` (e.g. `public`).
    #[must_use]
    pub fn new(schema: impl Into<String>, existence_check: ExistenceCheck) -> Self {
        Self {
            schema: schema.into(),
            existence_check,
        }
    }

    /// Returns the catalog schema this introspector reads.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns `true` if the table exists.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Database`] if the catalog query fails.
    pub async fn table_exists<C: Catalog>(&self, conn: &mut C, table: &str) -> Result<bool> {
        let exists = match self.existence_check {
            ExistenceCheck::Registry => conn.table_registered(&self.schema, table).await?,
            ExistenceCheck::ColumnCount => !conn.column_rows(&self.schema, table).await?.is_empty(),
        };
        debug!(schema = %self.schema, table, exists, "Checked table existence");
        Ok(exists)
    }

    /// Returns the table's columns as fields, in ordinal order. Empty if the
    /// table has no columns.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Database`] if the catalog query fails and
    /// [`ReconcileError::UnsupportedType`] for a column whose type cannot be
    /// mapped.
    pub async fn fetch_columns<C: Catalog>(&self, conn: &mut C, table: &str) -> Result<Vec<Field>> {
        conn.column_rows(&self.schema, table)
            .await?
            .iter()
            .map(|row| field_from_row(table, row))
            .collect()
    }
}

impl Default for Introspector {
    fn default() -> Self {
        Self::new("public", ExistenceCheck::default())
    }
}

/// Rebuilds a [`Field`] from one catalog row.
///
/// The type is resolved from `data_type`, falling back to `udt_name` for
/// catalog entries such as `USER-DEFINED`. Size comes from the character
/// length, or from precision and scale for `numeric` columns.
///
/// # Errors
///
/// Returns [`ReconcileError::UnsupportedType`] if neither spelling maps. The
/// error names the `udt_name`, the last spelling tried.
pub fn field_from_row(table: &str, row: &ColumnRow) -> Result<Field> {
    let data_type = DataType::from_catalog(&row.data_type)
        .or_else(|| DataType::from_catalog(&row.udt_name))
        .ok_or_else(|| ReconcileError::UnsupportedType {
            table: table.to_string(),
            column: row.column_name.clone(),
            type_name: row.udt_name.clone(),
        })?;

    let size = match (row.character_maximum_length, data_type) {
        (Some(length), _) => Some(length.to_string()),
        (None, DataType::Numeric) => row.numeric_precision.map(|precision| {
            match row.numeric_scale {
                Some(scale) if scale != 0 => format!("{precision},{scale}"),
                _ => precision.to_string(),
            }
        }),
        (None, _) => None,
    };

    Ok(Field {
        size,
        default: row.column_default.clone(),
        nullable: row.nullable(),
        ..Field::new(row.column_name.clone(), data_type)
    })
}
