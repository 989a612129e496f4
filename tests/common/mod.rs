//! Common test utilities for mm-ready tests

use std::io::Write;
use std::path::PathBuf;

use mm_ready::ParsedSchema;
use tempfile::NamedTempFile;

/// Write dump content to a temp `.sql` file
pub fn create_dump_file(content: &str) -> NamedTempFile {
    create_dump_file_bytes(content.as_bytes())
}

/// Write raw bytes to a temp `.sql` file
pub fn create_dump_file_bytes(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".sql").unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Parse a dump from `tests/fixtures`
pub fn parse_fixture(name: &str) -> ParsedSchema {
    let path = fixture_path(name);
    mm_ready::parse_dump(&path)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {:?}", path.display(), e))
}
