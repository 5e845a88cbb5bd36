//! Error types for schema declarations.

/// Errors raised while building or validating a declared schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The type name is not known to the type mapper.
    #[error("Unsupported type: '{0}'")]
    UnsupportedType(String),

    /// Two fields of one entity share a name.
    #[error("Entity '{entity}' declares field '{field}' more than once")]
    DuplicateField {
        /// Entity name.
        entity: String,
        /// The repeated field name.
        field: String,
    },

    /// An entity or field has an empty name.
    #[error("Empty name in entity '{0}'")]
    EmptyName(String),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
