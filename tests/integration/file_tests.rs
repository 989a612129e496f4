//! File loading: decoding, read failures and multi-dump parsing

use std::path::PathBuf;

use mm_ready::{parse_dump, parse_dumps, MmReadyError};
use tempfile::NamedTempFile;

use crate::common::{create_dump_file, create_dump_file_bytes, fixture_path};

#[test]
fn test_parse_dump_from_file() {
    let file = create_dump_file(
        "-- Dumped from database version 15.6\nCREATE TABLE public.t (\n    id integer NOT NULL\n);\n",
    );
    let schema = parse_dump(file.path()).unwrap();
    assert_eq!(schema.pg_version, "15.6");
    assert!(schema.get_table("public", "t").is_some());
}

#[test]
fn test_utf8_bom_is_stripped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"CREATE TABLE public.t (id integer);\n");
    let file = create_dump_file_bytes(&bytes);

    let schema = parse_dump(file.path()).unwrap();
    assert_eq!(schema.tables.len(), 1);
    assert_eq!(schema.tables[0].name, "t");
}

#[test]
fn test_invalid_utf8_is_replaced_not_fatal() {
    let mut bytes = b"CREATE TABLE public.t (\n    note text DEFAULT '".to_vec();
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    bytes.extend_from_slice(b"'::text\n);\nCREATE TABLE public.u (id integer);\n");
    let file = create_dump_file_bytes(&bytes);

    let schema = parse_dump(file.path()).unwrap();
    assert_eq!(schema.tables.len(), 2);
    let note = schema.get_table("public", "t").unwrap().column("note").unwrap();
    assert!(note.default_expr.as_deref().unwrap().contains('\u{FFFD}'));
}

#[test]
fn test_missing_file_is_a_read_error() {
    let path = PathBuf::from("/definitely/not/here/schema.sql");
    let err = parse_dump(&path).unwrap_err();

    match err.downcast_ref::<MmReadyError>() {
        Some(MmReadyError::DumpReadError { path: failed, .. }) => assert_eq!(failed, &path),
        other => panic!("Expected DumpReadError, got {:?}", other),
    }
    assert!(err.to_string().contains("schema.sql"));
}

#[test]
fn test_empty_file() {
    let file = create_dump_file("");
    let schema = parse_dump(file.path()).unwrap();
    assert!(schema.is_empty());
    assert_eq!(schema.pg_version, "");
}

#[test]
fn test_parse_dumps_requires_input() {
    let err = parse_dumps(&[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MmReadyError>(),
        Some(MmReadyError::NoInputFiles)
    ));
}

#[test]
fn test_parse_dumps_keeps_input_order() {
    // Enough files to take the parallel path
    let files: Vec<NamedTempFile> = (0..10)
        .map(|i| create_dump_file(&format!("CREATE TABLE public.t{} (id integer);\n", i)))
        .collect();
    let paths: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();

    let schemas = parse_dumps(&paths).unwrap();
    assert_eq!(schemas.len(), 10);
    for (i, schema) in schemas.iter().enumerate() {
        assert_eq!(schema.tables[0].name, format!("t{}", i));
    }
}

#[test]
fn test_parse_dumps_sequential_matches_single() {
    let sample = fixture_path("sample_schema.sql");
    let schemas = parse_dumps(&[sample.clone(), sample.clone()]).unwrap();
    let single = parse_dump(&sample).unwrap();
    assert_eq!(schemas[0], single);
    assert_eq!(schemas[1], single);
}

#[test]
fn test_parse_dumps_propagates_read_error() {
    let good = create_dump_file("CREATE TABLE public.t (id integer);\n");
    let paths = vec![good.path().to_path_buf(), PathBuf::from("/missing/dump.sql")];
    assert!(parse_dumps(&paths).is_err());
}
