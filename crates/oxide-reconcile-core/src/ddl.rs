//! PostgreSQL DDL generation.
//!
//! Pure functions from [`Field`]s to SQL text. Nothing here touches a
//! connection; the orchestrator decides which statements to run and in which
//! order.
//!
//! [`DdlDialect`] carries the statement shapes shared by SQL databases;
//! [`PostgresDdl`] supplies the PostgreSQL-specific identity and
//! `ALTER COLUMN` syntax.

use crate::diff::{ChangedField, FieldStatus};
use crate::field::Field;

/// Dialect-specific DDL generation for declared fields.
pub trait DdlDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Clause that makes a column generate its own values.
    fn identity_clause(&self) -> &'static str;

    /// Generates an `ALTER TABLE` that brings an existing column's type,
    /// default and nullability in line with `field`.
    fn alter_column(&self, table: &str, field: &Field) -> String;

    /// Quotes an identifier, doubling embedded quotes.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Renders a full column definition: name, type and the clauses for every
    /// flag set on the field.
    fn column_definition(&self, field: &Field) -> String {
        let mut sql = format!("{} {}", self.quote_identifier(&field.name), field.type_sql());

        if field.auto_increment {
            sql.push(' ');
            sql.push_str(self.identity_clause());
        }
        if !field.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = field.default_expr() {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        if field.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if field.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(target) = field.references.as_deref().filter(|t| !t.trim().is_empty()) {
            sql.push_str(" REFERENCES ");
            sql.push_str(target.trim());
        }

        sql
    }

    /// Generates `CREATE TABLE` with one column clause per field, in order.
    fn create_table(&self, table: &str, fields: &[Field]) -> String {
        let columns: Vec<String> = fields
            .iter()
            .map(|f| format!("    {}", self.column_definition(f)))
            .collect();
        format!(
            "CREATE TABLE {} (\n{}\n)",
            self.quote_identifier(table),
            columns.join(",\n")
        )
    }

    /// Generates `ALTER TABLE ... ADD COLUMN`.
    fn add_column(&self, table: &str, field: &Field) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            self.column_definition(field)
        )
    }

    /// Generates `CREATE INDEX IF NOT EXISTS` for a field that declares an
    /// index.
    fn create_index(&self, table: &str, field: &Field) -> Option<String> {
        let name = field.index_name(table)?;
        Some(format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            self.quote_identifier(&name),
            self.quote_identifier(table),
            self.quote_identifier(&field.name)
        ))
    }

    /// Statements that create `table` from scratch: the table itself followed
    /// by one index statement per indexed field.
    fn create_statements(&self, table: &str, fields: &[Field]) -> Vec<String> {
        let mut statements = vec![self.create_table(table, fields)];
        statements.extend(fields.iter().filter_map(|f| self.create_index(table, f)));
        statements
    }

    /// Statements that bring one classified field in line with its
    /// declaration: `ADD COLUMN` or `ALTER TABLE` as the status requires,
    /// followed by the index statement when the field declares an index.
    fn update_statements(&self, table: &str, changed: &ChangedField<'_>) -> Vec<String> {
        let mut statements = match changed.status {
            FieldStatus::New => vec![self.add_column(table, changed.field)],
            FieldStatus::Changed(_) => vec![self.alter_column(table, changed.field)],
            FieldStatus::Unchanged => Vec::new(),
        };
        // The index statement is idempotent, so an index added to an existing
        // column is picked up on the next pass.
        statements.extend(self.create_index(table, changed.field));
        statements
    }
}

/// Renders PostgreSQL DDL.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDdl;

impl PostgresDdl {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DdlDialect for PostgresDdl {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn identity_clause(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    /// Sets the type, the default when one is declared, and the nullability
    /// in one statement.
    ///
    /// Constraints (primary key, unique, references, identity) are left as
    /// they are.
    fn alter_column(&self, table: &str, field: &Field) -> String {
        let column = self.quote_identifier(&field.name);
        let mut clauses = vec![format!("ALTER COLUMN {column} TYPE {}", field.type_sql())];

        if let Some(default) = field.default_expr() {
            clauses.push(format!("ALTER COLUMN {column} SET DEFAULT {default}"));
        }

        if field.nullable {
            clauses.push(format!("ALTER COLUMN {column} DROP NOT NULL"));
        } else {
            clauses.push(format!("ALTER COLUMN {column} SET NOT NULL"));
        }

        format!(
            "ALTER TABLE {}\n    {}",
            self.quote_identifier(table),
            clauses.join(",\n    ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::classify;
    use crate::types::DataType;

    fn payment_fields() -> Vec<Field> {
        vec![
            Field::new("id", DataType::Int),
            Field::new("card", DataType::Varchar).size("20"),
            Field::new("created_at", DataType::Timestamp).default_value("CURRENT_TIMESTAMP"),
        ]
    }

    #[test]
    fn test_create_table() {
        let ddl = PostgresDdl::new();
        let sql = ddl.create_table("payments", &payment_fields());
        assert_eq!(
            sql,
            "CREATE TABLE \"payments\" (\n    \"id\" int NOT NULL,\n    \"card\" varchar(20) NOT NULL,\n    \"created_at\" timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP\n)"
        );
    }

    #[test]
    fn test_create_table_column_clauses() {
        let ddl = PostgresDdl::new();
        let mut fields = payment_fields();
        fields[1].nullable = true;
        let sql = ddl.create_table("payments", &fields);

        let body = sql
            .strip_prefix("CREATE TABLE \"payments\" (\n")
            .and_then(|s| s.strip_suffix("\n)"))
            .unwrap();
        let clauses: Vec<&str> = body.split(",\n").map(str::trim).collect();
        assert_eq!(clauses.len(), 3);
        assert!(clauses[0].starts_with("\"id\""));
        assert!(clauses[1].starts_with("\"card\""));
        assert!(clauses[2].starts_with("\"created_at\""));
        assert!(clauses[0].contains("NOT NULL"));
        assert!(!clauses[1].contains("NOT NULL"));
        assert!(clauses[2].contains("NOT NULL"));
    }

    #[test]
    fn test_add_column() {
        let ddl = PostgresDdl::new();
        let field = Field::new("balance", DataType::Int)
            .nullable()
            .default_value("0");
        assert_eq!(
            ddl.add_column("users", &field),
            "ALTER TABLE \"users\" ADD COLUMN \"balance\" int DEFAULT 0"
        );

        let field = Field::new("email", DataType::Varchar).size("100");
        assert_eq!(
            ddl.add_column("users", &field),
            "ALTER TABLE \"users\" ADD COLUMN \"email\" varchar(100) NOT NULL"
        );
    }

    #[test]
    fn test_alter_column() {
        let ddl = PostgresDdl::new();
        let field = Field::new("balance", DataType::Numeric)
            .size("6,2")
            .nullable()
            .default_value("0");
        assert_eq!(
            ddl.alter_column("users", &field),
            "ALTER TABLE \"users\"\n    ALTER COLUMN \"balance\" TYPE numeric(6,2),\n    ALTER COLUMN \"balance\" SET DEFAULT 0,\n    ALTER COLUMN \"balance\" DROP NOT NULL"
        );
    }

    #[test]
    fn test_alter_column_without_default() {
        let ddl = PostgresDdl::new();
        let field = Field::new("name", DataType::Varchar);
        let sql = ddl.alter_column("users", &field);
        assert!(sql.contains("TYPE varchar(255)"));
        assert!(!sql.contains("DEFAULT"));
        assert!(sql.ends_with("ALTER COLUMN \"name\" SET NOT NULL"));
    }

    #[test]
    fn test_constraint_clauses() {
        let ddl = PostgresDdl::new();
        let id = Field::new("id", DataType::BigInt)
            .primary_key()
            .auto_increment()
            .default_value("0");
        assert_eq!(
            ddl.column_definition(&id),
            "\"id\" bigint GENERATED BY DEFAULT AS IDENTITY NOT NULL PRIMARY KEY"
        );

        let email = Field::new("email", DataType::Varchar).size("100").unique();
        assert_eq!(
            ddl.column_definition(&email),
            "\"email\" varchar(100) NOT NULL UNIQUE"
        );

        let user_id = Field::new("user_id", DataType::BigInt).references("users (id)");
        assert_eq!(
            ddl.column_definition(&user_id),
            "\"user_id\" bigint NOT NULL REFERENCES users (id)"
        );
    }

    #[test]
    fn test_index_statements_follow_table() {
        let ddl = PostgresDdl::new();
        let fields = vec![
            Field::new("id", DataType::Int).primary_key(),
            Field::new("email", DataType::Varchar).indexed(),
        ];
        let statements = ddl.create_statements("users", &fields);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE"));
        assert_eq!(
            statements[1],
            "CREATE INDEX IF NOT EXISTS \"users_email_idx\" ON \"users\" (\"email\")"
        );
    }

    #[test]
    fn test_update_statements_per_status() {
        let ddl = PostgresDdl::new();
        let declared = vec![
            Field::new("id", DataType::Int),
            Field::new("name", DataType::Varchar).size("60"),
            Field::new("email", DataType::Varchar).index("by_email"),
        ];
        let live = vec![
            Field::new("id", DataType::Int),
            Field::new("name", DataType::Varchar).size("30"),
        ];
        let changes = classify(&declared, &live);

        assert!(ddl.update_statements("users", &changes[0]).is_empty());

        let alter = ddl.update_statements("users", &changes[1]);
        assert_eq!(alter.len(), 1);
        assert!(alter[0].contains("TYPE varchar(60)"));

        let add = ddl.update_statements("users", &changes[2]);
        assert_eq!(add.len(), 2);
        assert!(add[0].starts_with("ALTER TABLE \"users\" ADD COLUMN \"email\""));
        assert!(add[1].starts_with("CREATE INDEX IF NOT EXISTS \"by_email\""));
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        let ddl = PostgresDdl::new();
        assert_eq!(ddl.name(), "postgresql");
        assert_eq!(ddl.quote_identifier("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_identity_alter_never_sets_default() {
        let ddl = PostgresDdl::new();
        let id = Field::new("id", DataType::BigInt)
            .primary_key()
            .auto_increment()
            .default_value("0");
        let sql = ddl.alter_column("users", &id);
        assert!(!sql.contains("DEFAULT"));
        assert!(sql.ends_with("ALTER COLUMN \"id\" SET NOT NULL"));
    }

    #[test]
    fn test_index_on_existing_column() {
        let ddl = PostgresDdl::new();
        let declared = vec![
            Field::new("email", DataType::Varchar).size("100").indexed(),
            Field::new("name", DataType::Varchar).size("60").index("by_name"),
        ];
        let live = vec![
            Field::new("email", DataType::Varchar).size("100"),
            Field::new("name", DataType::Varchar).size("30"),
        ];
        let changes = classify(&declared, &live);

        assert_eq!(changes[0].status, FieldStatus::Unchanged);
        assert_eq!(
            ddl.update_statements("users", &changes[0]),
            ["CREATE INDEX IF NOT EXISTS \"users_email_idx\" ON \"users\" (\"email\")"]
        );

        let altered = ddl.update_statements("users", &changes[1]);
        assert_eq!(altered.len(), 2);
        assert!(altered[0].contains("TYPE varchar(60)"));
        assert!(altered[1].starts_with("CREATE INDEX IF NOT EXISTS \"by_name\""));
    }
}
