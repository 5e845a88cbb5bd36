//! Declarative field model.
//!
//! A [`Field`] describes one column. Declared fields come from the host
//! application (a [`Model`] implementation or an entity file); live fields are
//! rebuilt from catalog metadata. Both sides use the same type so the diff
//! engine can compare them attribute by attribute.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::types::DataType;

/// A single column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column type.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Length or precision for sized types, e.g. `"100"` or `"6,2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Default literal or expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Whether NULL is allowed.
    #[serde(default)]
    pub nullable: bool,
    /// Whether values are generated by an identity sequence.
    #[serde(default)]
    pub auto_increment: bool,
    /// Whether the column is the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the column carries a UNIQUE constraint.
    #[serde(default)]
    pub unique: bool,
    /// Secondary index on this column. An empty name asks for a generated one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Foreign key target, e.g. `users (id)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl Field {
    /// Creates a NOT NULL field with no default or constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            size: None,
            default: None,
            nullable: false,
            auto_increment: false,
            primary_key: false,
            unique: false,
            index: None,
            references: None,
        }
    }

    /// Creates a field from a type name (portable name or host alias).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedType`] if the type name is unknown.
    pub fn parse(name: impl Into<String>, type_name: &str) -> Result<Self> {
        Ok(Self::new(name, type_name.parse()?))
    }

    /// Sets the size.
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Sets the default expression.
    #[must_use]
    pub fn default_value(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    /// Allows NULL values.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Generates values from an identity sequence.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false; // Primary keys are always NOT NULL
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Requests a secondary index with a generated name.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.index = Some(String::new());
        self
    }

    /// Requests a secondary index with the given name.
    #[must_use]
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self
    }

    /// Adds a foreign key reference, e.g. `"users (id)"`.
    #[must_use]
    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.references = Some(target.into());
        self
    }

    /// Returns the declared default, treating an empty string as absent.
    ///
    /// Always `None` for auto-increment fields: identity columns cannot carry
    /// a default, so one declared alongside the flag is never rendered or
    /// compared.
    #[must_use]
    pub fn default_expr(&self) -> Option<&str> {
        if self.auto_increment {
            return None;
        }
        self.default.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Returns the size DDL would render: the declared size, or the type's
    /// default size. Always `None` for unsized types.
    #[must_use]
    pub fn effective_size(&self) -> Option<&str> {
        if !self.data_type.is_sized() {
            return None;
        }
        self.size
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.data_type.default_size())
    }

    /// Renders `type[(size)]` for DDL.
    #[must_use]
    pub fn type_sql(&self) -> String {
        self.data_type.render(self.size.as_deref())
    }

    /// Returns the index name for this column on `table`, if an index is
    /// declared.
    #[must_use]
    pub fn index_name(&self, table: &str) -> Option<String> {
        self.index.as_ref().map(|name| {
            if name.trim().is_empty() {
                format!("{table}_{}_idx", self.name)
            } else {
                name.clone()
            }
        })
    }
}

/// A named, ordered list of fields that maps to one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name, e.g. `UserPayment`.
    pub name: String,
    /// Fields in column order.
    pub fields: Vec<Field>,
}

impl Entity {
    /// Creates an entity.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Builds an entity from a [`Model`] implementation.
    #[must_use]
    pub fn of<M: Model>() -> Self {
        Self::new(M::NAME, M::fields())
    }

    /// Checks that the entity and every field are named and that field names
    /// are unique.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyName`] or [`SchemaError::DuplicateField`].
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, &self.fields)
    }
}

/// Validates a declared field list for `entity`.
///
/// # Errors
///
/// Returns [`SchemaError::EmptyName`] if the entity or a field is unnamed, and
/// [`SchemaError::DuplicateField`] for the first repeated field name.
pub fn validate_fields(entity: &str, fields: &[Field]) -> Result<()> {
    if entity.trim().is_empty() {
        return Err(SchemaError::EmptyName(entity.to_string()));
    }
    let mut seen = BTreeSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(SchemaError::EmptyName(entity.to_string()));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                entity: entity.to_string(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

/// A Rust type whose table layout is declared in code.
///
/// ```rust
/// use oxide_reconcile_core::{DataType, Field, Model};
///
/// struct User;
///
/// impl Model for User {
///     const NAME: &'static str = "User";
///
///     fn fields() -> Vec<Field> {
///         vec![
///             Field::new("id", DataType::Int).primary_key().auto_increment(),
///             Field::new("email", DataType::Varchar).size("100").unique(),
///         ]
///     }
/// }
/// ```
pub trait Model {
    /// Entity name, converted to the table identifier on reconciliation.
    const NAME: &'static str;

    /// Declared fields in column order.
    fn fields() -> Vec<Field>;
}
