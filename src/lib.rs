//! mm-ready: schema-dump parsing for multi-master replication readiness
//!
//! This library reads `pg_dump --schema-only` output and reconstructs the
//! tables, columns, constraints, indexes, sequences, extensions, enum types
//! and rules it declares, without a database connection.

pub mod error;
pub mod model;
pub mod parser;
mod util;

use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;

pub use error::MmReadyError;
pub use model::{ParsedSchema, EXCLUDED_SCHEMAS};
pub use parser::parse_dump_str;

/// Minimum number of dumps before parsing fans out across threads
const PARALLEL_THRESHOLD: usize = 8;

/// Parse a schema-only dump file
pub fn parse_dump(path: impl AsRef<Path>) -> Result<ParsedSchema> {
    parser::parse_dump_file(path.as_ref())
}

/// Parse several dump files, returning one schema per file in input order
pub fn parse_dumps(paths: &[PathBuf]) -> Result<Vec<ParsedSchema>> {
    if paths.is_empty() {
        return Err(MmReadyError::NoInputFiles.into());
    }

    if paths.len() >= PARALLEL_THRESHOLD {
        // Each dump is independent; collect keeps input order and the first error
        paths.par_iter().map(|path| parse_dump(path)).collect()
    } else {
        paths.iter().map(|path| parse_dump(path)).collect()
    }
}
