//! Database capability used by the reconciler.
//!
//! The reconciler needs three things from a database: to know whether a table
//! is registered, to list a table's columns, and to execute a statement.
//! [`Catalog`] captures exactly that. It is implemented for
//! [`sqlx::PgConnection`], so a pooled connection or an open transaction can
//! be passed in via deref (`&mut *conn`, `&mut *tx`).

use std::future::Future;

use futures::TryStreamExt;
use sqlx::PgConnection;
use tracing::debug;

use crate::error::{ReconcileError, Result};

/// Checks `information_schema.tables` for a table in a schema.
pub const TABLE_REGISTERED_SQL: &str = "\
SELECT EXISTS (
    SELECT 1 FROM information_schema.tables
    WHERE table_schema = $1 AND table_name = $2
)";

/// Lists a table's columns in ordinal order.
///
/// Domain-typed catalog columns are cast to plain types so they decode as
/// `text` and `int4`.
pub const COLUMNS_SQL: &str = "\
SELECT
    column_name::text AS column_name,
    data_type::text AS data_type,
    udt_name::text AS udt_name,
    character_maximum_length::int4 AS character_maximum_length,
    numeric_precision::int4 AS numeric_precision,
    numeric_scale::int4 AS numeric_scale,
    column_default::text AS column_default,
    is_nullable::text AS is_nullable
FROM information_schema.columns
WHERE table_schema = $1 AND table_name = $2
ORDER BY ordinal_position";

/// One row of `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnRow {
    /// Column name.
    pub column_name: String,
    /// Generic type name, e.g. `character varying`.
    pub data_type: String,
    /// Driver-native type name, e.g. `varchar`.
    pub udt_name: String,
    /// Declared length of character and bit types.
    pub character_maximum_length: Option<i32>,
    /// Precision of numeric types.
    pub numeric_precision: Option<i32>,
    /// Scale of numeric types.
    pub numeric_scale: Option<i32>,
    /// Default expression as rendered by the catalog.
    pub column_default: Option<String>,
    /// `YES` or `NO`.
    pub is_nullable: String,
}

impl ColumnRow {
    /// Creates a NOT NULL row with no size or default, the type given by its
    /// catalog spelling for both `data_type` and `udt_name`.
    #[must_use]
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            column_name: column_name.into(),
            udt_name: data_type.clone(),
            data_type,
            character_maximum_length: None,
            numeric_precision: None,
            numeric_scale: None,
            column_default: None,
            is_nullable: "NO".to_string(),
        }
    }

    /// Whether the catalog reports the column as nullable.
    #[must_use]
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("YES")
    }
}

/// Catalog queries and statement execution against one connection.
pub trait Catalog {
    /// Returns `true` if `schema.table` is registered in the catalog.
    fn table_registered(
        &mut self,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Returns the columns of `schema.table` in ordinal order. Empty if the
    /// table does not exist.
    fn column_rows(
        &mut self,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnRow>>> + Send;

    /// Executes a DDL statement. Statements return no rows; any error is
    /// reported as [`ReconcileError::Statement`].
    fn execute(&mut self, sql: &str) -> impl Future<Output = Result<()>> + Send;
}

impl Catalog for PgConnection {
    async fn table_registered(&mut self, schema: &str, table: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(TABLE_REGISTERED_SQL)
            .bind(schema)
            .bind(table)
            .fetch_one(&mut *self)
            .await?;
        Ok(exists)
    }

    async fn column_rows(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnRow>> {
        let mut rows = sqlx::query_as::<_, ColumnRow>(COLUMNS_SQL)
            .bind(schema)
            .bind(table)
            .fetch(&mut *self);

        let mut columns = Vec::new();
        while let Some(row) = rows.try_next().await? {
            columns.push(row);
        }
        debug!(schema, table, count = columns.len(), "Read catalog columns");
        Ok(columns)
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        sqlx::Executor::execute(&mut *self, sqlx::raw_sql(sql))
            .await
            .map_err(|source| ReconcileError::Statement {
                statement: sql.to_string(),
                source,
            })?;
        Ok(())
    }
}
