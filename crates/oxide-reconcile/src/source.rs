//! JSON entity files.
//!
//! An entity file lists the tables an application expects:
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "name": "User",
//!       "fields": [
//!         { "name": "id", "type": "int", "primary_key": true, "auto_increment": true },
//!         { "name": "email", "type": "varchar", "size": "100", "unique": true },
//!         { "name": "balance", "type": "numeric", "size": "6,2", "nullable": true, "default": "0" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Types accept portable names (`varchar`, `int`, ...) and host aliases
//! (`string`, `int64`, ...).

use std::path::Path;

use oxide_reconcile_core::Entity;
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

/// The contents of an entity file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFile {
    /// Entities in the order they should be reconciled.
    pub entities: Vec<Entity>,
}

impl EntityFile {
    /// Parses and validates entity file contents.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Serialization`] for malformed JSON or unknown
    /// types, and [`ReconcileError::Schema`] for duplicate or empty names.
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let file: Self =
            serde_json::from_str(contents).map_err(|source| ReconcileError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        for entity in &file.entities {
            entity.validate()?;
        }
        Ok(file)
    }

    /// Reads and parses an entity file.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Io`] if the file cannot be read, otherwise
    /// see [`EntityFile::parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ReconcileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use oxide_reconcile_core::{DataType, Field, SchemaError};

    use super::*;

    const USERS: &str = r#"{
        "entities": [
            {
                "name": "User",
                "fields": [
                    { "name": "id", "type": "int", "primary_key": true },
                    { "name": "email", "type": "string", "size": "100" },
                    { "name": "balance", "type": "numeric", "size": "6,2", "nullable": true, "default": "0" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_entity_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(USERS.as_bytes()).unwrap();

        let loaded = EntityFile::load(file.path()).unwrap();
        assert_eq!(loaded.entities.len(), 1);

        let user = &loaded.entities[0];
        assert_eq!(user.name, "User");
        assert_eq!(
            user.fields,
            vec![
                Field::new("id", DataType::Int).primary_key(),
                Field::new("email", DataType::Varchar).size("100"),
                Field::new("balance", DataType::Numeric)
                    .size("6,2")
                    .nullable()
                    .default_value("0"),
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EntityFile::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ReconcileError::Io { .. }));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{"entities": [{"name": "Shape", "fields": [{"name": "area", "type": "polygon"}]}]}"#;
        let err = EntityFile::parse(Path::new("shapes.json"), json).unwrap_err();
        assert!(matches!(err, ReconcileError::Serialization { .. }));
        assert!(err.to_string().contains("polygon"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let json = r#"{"entities": [{"name": "User", "fields": [
            {"name": "id", "type": "int"},
            {"name": "id", "type": "bigint"}
        ]}]}"#;
        let err = EntityFile::parse(Path::new("users.json"), json).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Schema(SchemaError::DuplicateField { .. })
        ));
    }
}
