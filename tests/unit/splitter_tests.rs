//! Unit tests for the pg_dump statement splitter

use mm_ready::parser::{split_statements, StatementSplitter, DEFAULT_SEARCH_PATH};

// ============================================================================
// Statement Boundaries
// ============================================================================

#[test]
fn test_plpgsql_body_is_one_statement() {
    let sql = "CREATE FUNCTION f() RETURNS void AS $$\nBEGIN\n  INSERT INTO x VALUES (1); -- semicolon inside body\nEND;\n$$ LANGUAGE plpgsql;";
    let (statements, _) = split_statements(sql);
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.contains("INSERT INTO x VALUES (1);"));
}

#[test]
fn test_pg_dump_function_layout() {
    let sql = r#"
CREATE FUNCTION public.audit() RETURNS trigger
    LANGUAGE plpgsql
    AS $_$
BEGIN
    PERFORM pg_notify('audit', $1);
    RETURN NEW;
END;
$_$;

ALTER FUNCTION public.audit() OWNER TO app;
"#;
    let (statements, _) = split_statements(sql);
    assert_eq!(statements.len(), 2);
    assert!(statements[0].sql.ends_with("$_$;"));
    assert_eq!(statements[1].sql, "ALTER FUNCTION public.audit() OWNER TO app;");
}

#[test]
fn test_statement_ends_only_at_line_end() {
    let sql = "SET a = 1; SET b = 2;\nCREATE TABLE t (\n    v text DEFAULT 'x;y'\n);";
    let (statements, _) = split_statements(sql);
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].sql, "SET a = 1; SET b = 2;");
}

#[test]
fn test_crlf_line_endings() {
    let sql = "-- Dumped from database version 14.11\r\nCREATE TABLE t (\r\n    id int\r\n);\r\n";
    let (statements, version) = split_statements(sql);
    assert_eq!(version, "14.11");
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.starts_with("CREATE TABLE t ("));
}

// ============================================================================
// Search Path Tracking
// ============================================================================

#[test]
fn test_default_search_path() {
    let (statements, _) = split_statements("CREATE TABLE t (id int);");
    assert_eq!(statements[0].search_path, DEFAULT_SEARCH_PATH);
}

#[test]
fn test_set_config_search_path() {
    let sql = "SELECT pg_catalog.set_config('search_path', 'sales, pg_catalog', false);\nCREATE TABLE t (id int);";
    let (statements, _) = split_statements(sql);
    assert_eq!(statements[1].search_path, "sales");
}

#[test]
fn test_user_placeholder_is_skipped() {
    let sql = "SET search_path = \"$user\", public;\nCREATE TABLE t (id int);";
    let (statements, _) = split_statements(sql);
    assert_eq!(statements[1].search_path, "public");

    let sql = "SET search_path = \"$user\", app;\nCREATE TABLE t (id int);";
    let (statements, _) = split_statements(sql);
    assert_eq!(statements[1].search_path, "app");
}

#[test]
fn test_splitter_reports_current_search_path() {
    let mut splitter = StatementSplitter::new("SET search_path = app;\nSELECT 1;\n");
    assert_eq!(splitter.search_path(), "public");
    splitter.next();
    assert_eq!(splitter.search_path(), "app");
}
