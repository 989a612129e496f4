//! Unit tests for the schema model lookups

use mm_ready::model::{
    is_excluded_schema, Column, ConstraintType, IdentityKind, ParsedSchema, ReferentialAction,
    RuleEvent, Table, EXCLUDED_SCHEMAS,
};
use mm_ready::parse_dump_str;

fn sample() -> ParsedSchema {
    parse_dump_str(
        r#"
CREATE TABLE public.a (
    id integer NOT NULL,
    b_id integer
);
CREATE TABLE public.b (
    id integer NOT NULL
);
ALTER TABLE ONLY public.a ADD CONSTRAINT a_pkey PRIMARY KEY (id);
ALTER TABLE ONLY public.a ADD CONSTRAINT a_b_fk FOREIGN KEY (b_id) REFERENCES public.b(id);
ALTER TABLE ONLY public.b ADD CONSTRAINT b_pkey PRIMARY KEY (id);
CREATE INDEX a_b_idx ON public.a USING btree (b_id);
CREATE INDEX b_hash ON public.b USING hash (id);
"#,
    )
}

#[test]
fn test_get_table() {
    let schema = sample();
    assert_eq!(schema.get_table("public", "a").unwrap().columns.len(), 2);
    assert!(schema.get_table("other", "a").is_none());
    assert!(schema.get_table("public", "A").is_none());
}

#[test]
fn test_get_constraints_for_table() {
    let schema = sample();
    assert_eq!(schema.get_constraints_for_table("public", "a", None).len(), 2);

    let fks = schema.get_constraints_for_table("public", "a", Some(ConstraintType::ForeignKey));
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].name, "a_b_fk");
    assert_eq!(fks[0].on_delete, ReferentialAction::NoAction);

    assert!(schema
        .get_constraints_for_table("public", "b", Some(ConstraintType::Unique))
        .is_empty());
}

#[test]
fn test_get_indexes_for_table() {
    let schema = sample();
    let indexes = schema.get_indexes_for_table("public", "b");
    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].index_method, "hash");
    assert!(schema.get_indexes_for_table("public", "c").is_empty());
}

#[test]
fn test_counts() {
    let schema = sample();
    assert_eq!(schema.object_count(), 7);
    assert!(!schema.is_empty());
    assert!(ParsedSchema::new().is_empty());
}

#[test]
fn test_excluded_schema_constant() {
    assert_eq!(
        EXCLUDED_SCHEMAS,
        ["pg_catalog", "information_schema", "spock", "pg_toast"]
    );
    assert!(is_excluded_schema("pg_toast"));
    assert!(!is_excluded_schema("public"));
    assert!(!is_excluded_schema("PG_CATALOG"));
}

#[test]
fn test_table_helpers() {
    let mut table = Table::new("sales", "orders");
    let mut id = Column::new("id", "bigint");
    id.identity = Some(IdentityKind::Always);
    table.columns.push(id);

    assert_eq!(table.qualified_name(), "sales.orders");
    assert!(table.column("id").unwrap().is_sequence_backed());
    assert!(table.column("missing").is_none());
}

#[test]
fn test_display_spellings() {
    assert_eq!(ConstraintType::PrimaryKey.to_string(), "PRIMARY KEY");
    assert_eq!(IdentityKind::ByDefault.to_string(), "BY DEFAULT");
    assert_eq!(ReferentialAction::SetDefault.to_string(), "SET DEFAULT");
    assert_eq!(RuleEvent::Insert.to_string(), "INSERT");
}
