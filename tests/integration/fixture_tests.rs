//! Parsing a realistic pg_dump schema-only file end to end

use mm_ready::model::{ConstraintType, IdentityKind, ReferentialAction, RuleEvent};
use pretty_assertions::assert_eq;

use crate::common::parse_fixture;

const SAMPLE: &str = "sample_schema.sql";

#[test]
fn test_sample_header_and_counts() {
    let schema = parse_fixture(SAMPLE);

    assert_eq!(schema.pg_version, "16.4");
    assert_eq!(schema.tables.len(), 5);
    assert_eq!(schema.constraints.len(), 7);
    assert_eq!(schema.indexes.len(), 3);
    assert_eq!(schema.sequences.len(), 1);
    assert_eq!(schema.extensions.len(), 1);
    assert_eq!(schema.enum_types.len(), 1);
    assert_eq!(schema.rules.len(), 1);
    assert_eq!(schema.object_count(), 19);
}

#[test]
fn test_sample_table_order_and_names() {
    let schema = parse_fixture(SAMPLE);
    let names: Vec<String> = schema.tables.iter().map(|t| t.qualified_name()).collect();
    assert_eq!(
        names,
        vec![
            "public.customers",
            "public.orders",
            "public.audit_log",
            "public.events",
            "inventory.items",
        ]
    );
}

#[test]
fn test_sample_excluded_schema_objects_absent() {
    let schema = parse_fixture(SAMPLE);

    assert!(schema.get_table("spock", "node").is_none());
    assert!(schema.get_constraints_for_table("spock", "node", None).is_empty());
    assert!(schema.extensions.iter().all(|e| e.name != "spock"));
    assert!(schema.tables.iter().all(|t| !mm_ready::EXCLUDED_SCHEMAS.contains(&t.schema.as_str())));
}

#[test]
fn test_sample_customers_columns() {
    let schema = parse_fixture(SAMPLE);
    let customers = schema.get_table("public", "customers").unwrap();

    let types: Vec<(&str, &str, bool)> = customers
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.data_type.as_str(), c.not_null))
        .collect();
    assert_eq!(
        types,
        vec![
            ("id", "bigint", true),
            ("email", "character varying(255)", true),
            ("display_name", "text", false),
            ("created_at", "timestamp with time zone", true),
            ("updated_at", "timestamp with time zone", false),
        ]
    );

    let id = customers.column("id").unwrap();
    assert_eq!(
        id.default_expr.as_deref(),
        Some("nextval('public.customers_id_seq'::regclass)")
    );
    assert!(id.is_sequence_backed());
    assert_eq!(
        customers.column("created_at").unwrap().default_expr.as_deref(),
        Some("now()")
    );
}

#[test]
fn test_sample_orders_columns() {
    let schema = parse_fixture(SAMPLE);
    let orders = schema.get_table("public", "orders").unwrap();

    let id = orders.column("id").unwrap();
    assert_eq!(id.identity, Some(IdentityKind::Always));

    let status = orders.column("status").unwrap();
    assert_eq!(status.data_type, "public.order_status");
    assert_eq!(
        status.default_expr.as_deref(),
        Some("'pending'::public.order_status")
    );
    assert!(status.not_null);

    let total = orders.column("total").unwrap();
    assert_eq!(total.data_type, "numeric(12,2)");
    assert_eq!(total.default_expr.as_deref(), Some("0"));

    let tax = orders.column("tax").unwrap();
    assert_eq!(tax.data_type, "numeric(12,2)");
    assert_eq!(tax.generated_expr.as_deref(), Some("(total * 0.2)"));
    assert!(tax.default_expr.is_none());
}

#[test]
fn test_sample_table_options() {
    let schema = parse_fixture(SAMPLE);

    let audit = schema.get_table("public", "audit_log").unwrap();
    assert!(audit.unlogged);
    let audit_id = audit.column("id").unwrap();
    assert_eq!(audit_id.identity, Some(IdentityKind::ByDefault));
    assert!(audit_id.default_expr.is_none());

    let events = schema.get_table("public", "events").unwrap();
    assert_eq!(events.partition_by.as_deref(), Some("RANGE (occurred_at)"));
    assert!(!events.unlogged);
}

#[test]
fn test_sample_search_path_table() {
    let schema = parse_fixture(SAMPLE);
    let items = schema.get_table("inventory", "items").unwrap();

    assert_eq!(items.columns[1].name, "Warehouse Code");

    let pk =
        schema.get_constraints_for_table("inventory", "items", Some(ConstraintType::PrimaryKey));
    assert_eq!(pk.len(), 1);
    assert_eq!(pk[0].columns, vec!["sku", "Warehouse Code"]);

    let checks =
        schema.get_constraints_for_table("inventory", "items", Some(ConstraintType::Check));
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].name, "items_quantity_check");
    assert_eq!(checks[0].check_expression.as_deref(), Some("(quantity >= 0)"));
}

#[test]
fn test_sample_constraints() {
    let schema = parse_fixture(SAMPLE);

    let names: Vec<&str> = schema.constraints.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "orders_total_check",
            "items_quantity_check",
            "customers_email_key",
            "customers_pkey",
            "orders_pkey",
            "items_pkey",
            "orders_customer_id_fkey",
        ]
    );

    let fks =
        schema.get_constraints_for_table("public", "orders", Some(ConstraintType::ForeignKey));
    assert_eq!(fks.len(), 1);
    let fk = fks[0];
    assert_eq!(fk.columns, vec!["customer_id"]);
    assert_eq!(fk.ref_schema, "public");
    assert_eq!(fk.ref_table, "customers");
    assert_eq!(fk.ref_columns, vec!["id"]);
    assert_eq!(fk.on_delete, ReferentialAction::Cascade);
    assert_eq!(fk.on_update, ReferentialAction::NoAction);
    assert!(!fk.deferrable);

    let unique =
        schema.get_constraints_for_table("public", "customers", Some(ConstraintType::Unique));
    assert_eq!(unique[0].columns, vec!["email"]);
}

#[test]
fn test_sample_indexes() {
    let schema = parse_fixture(SAMPLE);

    let order_indexes = schema.get_indexes_for_table("public", "orders");
    assert_eq!(order_indexes.len(), 2);
    assert_eq!(order_indexes[0].name, "idx_orders_customer");
    assert!(order_indexes[0].predicate.is_none());
    assert_eq!(order_indexes[1].name, "idx_orders_open");
    assert_eq!(
        order_indexes[1].predicate.as_deref(),
        Some("(status <> 'shipped'::public.order_status)")
    );

    let customer_indexes = schema.get_indexes_for_table("public", "customers");
    assert_eq!(customer_indexes.len(), 1);
    assert!(customer_indexes[0].is_unique);
    assert_eq!(customer_indexes[0].index_method, "btree");
    assert_eq!(customer_indexes[0].columns, vec!["lower((email)::text)"]);
}

#[test]
fn test_sample_sequence_extension_enum_rule() {
    let schema = parse_fixture(SAMPLE);

    let seq = schema.get_sequence("public", "customers_id_seq").unwrap();
    assert_eq!(seq.data_type, "bigint");
    assert_eq!(seq.start_value, Some(1));
    assert_eq!(seq.cache, Some(1));
    assert_eq!(seq.owned_by_table.as_deref(), Some("public.customers"));
    assert_eq!(seq.owned_by_column.as_deref(), Some("id"));

    assert_eq!(schema.extensions[0].name, "pgcrypto");
    assert_eq!(schema.extensions[0].schema, "public");

    assert_eq!(
        schema.enum_types[0].labels,
        vec!["pending", "paid", "shipped", "cancelled"]
    );

    let rule = &schema.rules[0];
    assert_eq!(rule.rule_name, "protect_audit");
    assert_eq!(rule.event, RuleEvent::Delete);
    assert_eq!(rule.table_name, "audit_log");
    assert!(rule.is_instead);
}

#[test]
fn test_sample_is_deterministic() {
    assert_eq!(parse_fixture(SAMPLE), parse_fixture(SAMPLE));
}
