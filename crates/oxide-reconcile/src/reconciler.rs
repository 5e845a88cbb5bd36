//! Reconciliation orchestrator.
//!
//! Drives one entity from declaration to applied DDL:
//!
//! 1. resolve the table identifier from the entity name,
//! 2. check whether the table exists,
//! 3. absent: create it; present: introspect, classify and alter it.
//!
//! Statements run one at a time in declared-field order. The first failure
//! stops the pass and is returned; statements that already ran stay applied
//! unless the pass runs inside [`Reconciler::reconcile_in_transaction`].
//! Columns and tables are never dropped.

use oxide_reconcile_core::{
    DdlDialect, Entity, Field, FieldStatus, Model, PostgresDdl, classify, to_table_identifier,
    validate_fields,
};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::introspect::{ExistenceCheck, Introspector};

/// Settings for a [`Reconciler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Catalog schema the tables live in.
    pub schema: String,
    /// Whether table identifiers are pluralized (`User` -> `users`).
    pub pluralize: bool,
    /// How table existence is decided.
    pub existence_check: ExistenceCheck,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            pluralize: true,
            existence_check: ExistenceCheck::Registry,
        }
    }
}

impl ReconcileOptions {
    /// Creates the default options: schema `public`, pluralized names,
    /// registry existence check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the catalog schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Enables or disables pluralized table names.
    #[must_use]
    pub fn pluralize(mut self, enabled: bool) -> Self {
        self.pluralize = enabled;
        self
    }

    /// Sets the existence check.
    #[must_use]
    pub fn existence_check(mut self, check: ExistenceCheck) -> Self {
        self.existence_check = check;
        self
    }
}

/// Brings tables in line with entity declarations.
#[derive(Debug, Clone)]
pub struct Reconciler {
    options: ReconcileOptions,
    introspector: Introspector,
    ddl: PostgresDdl,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileOptions::default())
    }
}

impl Reconciler {
    /// Creates a reconciler.
    #[must_use]
    pub fn new(options: ReconcileOptions) -> Self {
        let introspector = Introspector::new(options.schema.clone(), options.existence_check);
        Self {
            options,
            introspector,
            ddl: PostgresDdl::new(),
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Returns the table identifier used for `entity_name`.
    #[must_use]
    pub fn table_name(&self, entity_name: &str) -> String {
        to_table_identifier(entity_name, self.options.pluralize)
    }

    /// Returns the statements a reconciliation would execute, without
    /// executing them. Only catalog queries are issued.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration is invalid or the catalog cannot
    /// be read.
    pub async fn plan<C: Catalog>(
        &self,
        conn: &mut C,
        entity_name: &str,
        fields: &[Field],
    ) -> Result<Vec<String>> {
        validate_fields(entity_name, fields)?;
        let table = self.table_name(entity_name);

        if !self.introspector.table_exists(conn, &table).await? {
            info!(table = %table, "Table does not exist, planning CREATE TABLE");
            return Ok(self.ddl.create_statements(&table, fields));
        }

        let live = self.introspector.fetch_columns(conn, &table).await?;
        let changes = classify(fields, &live);

        let mut statements = Vec::new();
        for change in &changes {
            let column = &change.field.name;
            match &change.status {
                FieldStatus::New => {
                    info!(table = %table, column = %column, "Planning ADD COLUMN");
                }
                FieldStatus::Changed(attrs) => {
                    let attrs: Vec<String> = attrs.iter().map(ToString::to_string).collect();
                    info!(
                        table = %table,
                        column = %column,
                        changed = %attrs.join(", "),
                        "Planning ALTER COLUMN"
                    );
                }
                FieldStatus::Unchanged => {
                    debug!(table = %table, column = %column, "Column unchanged");
                }
            }
            statements.extend(self.ddl.update_statements(&table, change));
        }
        Ok(statements)
    }

    /// Reconciles `entity_name`'s table with `fields`.
    ///
    /// # Errors
    ///
    /// Returns the first failure: an invalid declaration, a catalog error,
    /// an unsupported live column type, or the first rejected statement.
    pub async fn reconcile<C: Catalog>(
        &self,
        conn: &mut C,
        entity_name: &str,
        fields: &[Field],
    ) -> Result<()> {
        let statements = self.plan(conn, entity_name, fields).await?;
        if statements.is_empty() {
            info!(entity = entity_name, "Table is up to date");
            return Ok(());
        }

        for sql in &statements {
            debug!(sql = %sql, "Executing SQL");
            conn.execute(sql).await?;
        }

        info!(
            entity = entity_name,
            statements = statements.len(),
            "Reconciled table"
        );
        Ok(())
    }

    /// Reconciles an [`Entity`].
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`].
    pub async fn reconcile_entity<C: Catalog>(&self, conn: &mut C, entity: &Entity) -> Result<()> {
        self.reconcile(conn, &entity.name, &entity.fields).await
    }

    /// Reconciles the table declared by a [`Model`] type.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`].
    pub async fn reconcile_model<M: Model, C: Catalog>(&self, conn: &mut C) -> Result<()> {
        self.reconcile(conn, M::NAME, &M::fields()).await
    }

    /// Reconciles on a connection taken from `pool`.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`]; also fails if no connection can be
    /// acquired.
    pub async fn reconcile_with_pool(&self, pool: &PgPool, entity: &Entity) -> Result<()> {
        let mut conn = pool.acquire().await?;
        self.reconcile_entity(&mut *conn, entity).await
    }

    /// Reconciles inside one transaction: committed when every statement
    /// succeeds, rolled back on the first failure.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`]; also fails if the transaction cannot be
    /// opened or committed.
    pub async fn reconcile_in_transaction(&self, pool: &PgPool, entity: &Entity) -> Result<()> {
        let mut tx = pool.begin().await?;
        // Dropping `tx` on error rolls it back.
        self.reconcile_entity(&mut *tx, entity).await?;
        tx.commit().await?;
        Ok(())
    }
}
