//! Sequence definition parsing for PostgreSQL dumps
//!
//! ## Supported Syntax
//!
//! CREATE SEQUENCE:
//! ```sql
//! CREATE SEQUENCE public.users_id_seq
//!     AS integer
//!     START WITH 1
//!     INCREMENT BY 1
//!     NO MINVALUE
//!     NO MAXVALUE
//!     CACHE 1;
//! ```
//!
//! ALTER SEQUENCE (ownership only):
//! ```sql
//! ALTER SEQUENCE public.users_id_seq OWNED BY public.users.id;
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{split_qualified, unquote, IDENT, QUALIFIED_NAME};
use super::statement::SchemaStatement;
use crate::model::Sequence;

static CREATE_SEQUENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+SEQUENCE\s+(?:IF\s+NOT\s+EXISTS\s+)?({QUALIFIED_NAME})"
    ))
    .unwrap()
});

static OWNED_BY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*ALTER\s+SEQUENCE\s+({QUALIFIED_NAME})\s+OWNED\s+BY\s+({QUALIFIED_NAME})\.({IDENT})"
    ))
    .unwrap()
});

static AS_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAS\s+(smallint|integer|bigint)\b").unwrap());

static START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSTART\s+(?:WITH\s+)?(-?\d+)").unwrap());

static INCREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINCREMENT\s+(?:BY\s+)?(-?\d+)").unwrap());

static MINVALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMINVALUE\s+(-?\d+)").unwrap());

static MAXVALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMAXVALUE\s+(-?\d+)").unwrap());

static CACHE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCACHE\s+(\d+)").unwrap());

static CYCLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bCYCLE\b").unwrap());

static NO_CYCLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNO\s+CYCLE\b").unwrap());

/// Extract `CREATE SEQUENCE [IF NOT EXISTS] name [options]`
pub fn extract_create_sequence(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = CREATE_SEQUENCE_RE.captures(sql)?;
    let (schema, name) = split_qualified(&caps[1], search_path);
    let options = &sql[caps.get(0)?.end()..];

    let mut sequence = Sequence::new(schema, name);
    if let Some(c) = AS_TYPE_RE.captures(options) {
        sequence.data_type = c[1].to_lowercase();
    }
    sequence.start_value = capture_i64(&START_RE, options);
    if let Some(increment) = capture_i64(&INCREMENT_RE, options) {
        sequence.increment = increment;
    }
    sequence.min_value = capture_i64(&MINVALUE_RE, options);
    sequence.max_value = capture_i64(&MAXVALUE_RE, options);
    sequence.cache = capture_i64(&CACHE_RE, options);
    sequence.cycle = CYCLE_RE.is_match(options) && !NO_CYCLE_RE.is_match(options);

    Some(SchemaStatement::CreateSequence(sequence))
}

/// Extract `ALTER SEQUENCE name OWNED BY table.column`
///
/// `OWNED BY NONE` has no table part and is not matched.
pub fn extract_sequence_owner(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = OWNED_BY_RE.captures(sql)?;
    let (schema, sequence) = split_qualified(&caps[1], search_path);
    let (table_schema, table) = split_qualified(&caps[2], search_path);

    Some(SchemaStatement::SetSequenceOwner {
        schema,
        sequence,
        owner_table: format!("{}.{}", table_schema, table),
        owner_column: unquote(&caps[3]),
    })
}

/// Parse the first capture group as an i64; out-of-range values are dropped
fn capture_i64(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
