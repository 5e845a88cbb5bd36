//! Error types for reconciliation.

use std::path::PathBuf;

use oxide_reconcile_core::SchemaError;

/// Errors that can occur while reconciling a table.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// A catalog query or connection call failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A DDL statement was rejected. Statements before it stay applied.
    #[error("Statement failed: {source}\n{statement}")]
    Statement {
        /// The SQL that failed.
        statement: String,
        /// The driver error.
        #[source]
        source: sqlx::Error,
    },

    /// A live column has a type the type mapper does not know.
    #[error("Column '{table}.{column}' has unsupported type '{type_name}'")]
    UnsupportedType {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Catalog type name.
        type_name: String,
    },

    /// The declared schema is invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// IO error (reading entity files).
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Entity file could not be parsed.
    #[error("Failed to parse entity file '{path}': {source}")]
    Serialization {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, ReconcileError>;
