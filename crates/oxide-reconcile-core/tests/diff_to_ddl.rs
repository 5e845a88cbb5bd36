//! Integration tests for the diff engine feeding the DDL generator.
//!
//! Each test declares a table the way an application would, builds the live
//! column list the catalog would report, and checks the statements the two
//! together produce.

use oxide_reconcile_core::{
    Attribute, DataType, DdlDialect, Entity, Field, FieldStatus, Model, PostgresDdl, classify,
    to_table_identifier,
};

struct UserPayment;

impl Model for UserPayment {
    const NAME: &'static str = "UserPayment";

    fn fields() -> Vec<Field> {
        vec![
            Field::new("id", DataType::BigInt).primary_key().auto_increment(),
            Field::new("user_id", DataType::BigInt)
                .references("users (id)")
                .indexed(),
            Field::new("amount", DataType::Numeric).size("10,2"),
            Field::new("note", DataType::Text).nullable(),
            Field::new("paid_at", DataType::Timestamp).default_value("CURRENT_TIMESTAMP"),
        ]
    }
}

fn statements(table: &str, declared: &[Field], live: &[Field]) -> Vec<String> {
    let ddl = PostgresDdl::new();
    classify(declared, live)
        .iter()
        .flat_map(|change| ddl.update_statements(table, change))
        .collect()
}

#[test]
fn model_creates_pluralized_table() {
    let entity = Entity::of::<UserPayment>();
    let table = to_table_identifier(&entity.name, true);
    assert_eq!(table, "user_payments");

    let created = PostgresDdl::new().create_statements(&table, &entity.fields);
    assert_eq!(created.len(), 2);
    assert!(created[0].starts_with("CREATE TABLE \"user_payments\" ("));
    assert!(created[0].contains("\"id\" bigint GENERATED BY DEFAULT AS IDENTITY NOT NULL PRIMARY KEY"));
    assert!(created[0].contains("\"note\" text,"));
    assert_eq!(
        created[1],
        "CREATE INDEX IF NOT EXISTS \"user_payments_user_id_idx\" ON \"user_payments\" (\"user_id\")"
    );
}

#[test]
fn balance_column_is_added_then_altered() {
    let live = vec![
        Field::new("id", DataType::Int),
        Field::new("name", DataType::Varchar).size("30"),
    ];

    let declared = vec![
        Field::new("balance", DataType::Int)
            .nullable()
            .default_value("0"),
    ];
    let first = statements("users", &declared, &live);
    assert_eq!(
        first,
        ["ALTER TABLE \"users\" ADD COLUMN \"balance\" int DEFAULT 0"]
    );

    // The column now exists as an int; the declaration moves to numeric(6,2).
    let mut live = live;
    live.push(
        Field::new("balance", DataType::Int)
            .nullable()
            .default_value("0"),
    );
    let declared = vec![
        Field::new("balance", DataType::Numeric)
            .size("6,2")
            .nullable()
            .default_value("0"),
    ];
    let changes = classify(&declared, &live);
    assert_eq!(
        changes[0].changed_attributes().into_iter().collect::<Vec<_>>(),
        [Attribute::DataType, Attribute::Size]
    );

    let second = statements("users", &declared, &live);
    assert_eq!(second.len(), 1);
    assert!(second[0].starts_with("ALTER TABLE \"users\""));
    assert!(second[0].contains("ALTER COLUMN \"balance\" TYPE numeric(6,2)"));
    assert!(second[0].contains("ALTER COLUMN \"balance\" SET DEFAULT 0"));
    assert!(second[0].contains("ALTER COLUMN \"balance\" DROP NOT NULL"));
}

#[test]
fn converged_table_only_repeats_index() {
    let declared = UserPayment::fields();
    let live = vec![
        Field::new("id", DataType::BigInt).default_value("nextval('user_payments_id_seq'::regclass)"),
        Field::new("user_id", DataType::BigInt),
        Field::new("amount", DataType::Numeric).size("10,2"),
        Field::new("note", DataType::Text).nullable(),
        Field::new("paid_at", DataType::Timestamp).default_value("CURRENT_TIMESTAMP"),
    ];
    let changes = classify(&declared, &live);
    assert!(changes.iter().all(|c| c.status == FieldStatus::Unchanged));
    assert_eq!(
        statements("user_payments", &declared, &live),
        ["CREATE INDEX IF NOT EXISTS \"user_payments_user_id_idx\" ON \"user_payments\" (\"user_id\")"]
    );
}

#[test]
fn dropped_declarations_leave_columns_alone() {
    let live = vec![
        Field::new("id", DataType::Int),
        Field::new("legacy", DataType::Text).nullable(),
    ];
    let declared = vec![Field::new("id", DataType::Int)];
    assert!(statements("users", &declared, &live).is_empty());
}
