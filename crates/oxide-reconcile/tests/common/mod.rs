//! In-memory catalog for reconciliation tests.

use std::collections::HashMap;

use oxide_reconcile::catalog::{Catalog, ColumnRow};
use oxide_reconcile::error::{ReconcileError, Result};

/// A catalog backed by a map of `schema.table` to column rows.
///
/// Statements are recorded, not applied, so each test sets up the live state
/// it wants to compare against.
#[derive(Debug, Default)]
pub struct MockCatalog {
    tables: HashMap<String, Vec<ColumnRow>>,
    fail_at: Option<usize>,
    /// Statements that executed successfully, in order.
    pub executed: Vec<String>,
    /// Number of `table_registered` calls.
    pub registry_queries: usize,
    /// Number of `column_rows` calls.
    pub column_queries: usize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table with the given columns.
    pub fn with_table(mut self, schema: &str, table: &str, columns: Vec<ColumnRow>) -> Self {
        self.tables.insert(format!("{schema}.{table}"), columns);
        self
    }

    /// Makes the statement at zero-based position `index` fail.
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl Catalog for MockCatalog {
    async fn table_registered(&mut self, schema: &str, table: &str) -> Result<bool> {
        self.registry_queries += 1;
        Ok(self.tables.contains_key(&format!("{schema}.{table}")))
    }

    async fn column_rows(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnRow>> {
        self.column_queries += 1;
        Ok(self
            .tables
            .get(&format!("{schema}.{table}"))
            .cloned()
            .unwrap_or_default())
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        if self.fail_at == Some(self.executed.len()) {
            return Err(ReconcileError::Statement {
                statement: sql.to_string(),
                source: sqlx::Error::Protocol("relation is locked".to_string()),
            });
        }
        self.executed.push(sql.to_string());
        Ok(())
    }
}

/// A NOT NULL `integer` column.
pub fn int_column(name: &str) -> ColumnRow {
    ColumnRow::new(name, "integer")
}

/// A NOT NULL `character varying(length)` column.
pub fn varchar_column(name: &str, length: i32) -> ColumnRow {
    ColumnRow {
        udt_name: "varchar".to_string(),
        character_maximum_length: Some(length),
        ..ColumnRow::new(name, "character varying")
    }
}
