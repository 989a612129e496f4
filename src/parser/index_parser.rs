//! `CREATE INDEX` parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE [UNIQUE] INDEX [CONCURRENTLY] [IF NOT EXISTS] name
//!     ON [ONLY] schema.table [USING method] (column_or_expression [, ...])
//!     [INCLUDE (...)] [WITH (...)] [WHERE predicate];
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    end_of_first_paren_group, parse_column_list, split_qualified, unquote, IDENT, QUALIFIED_NAME,
};
use super::statement::SchemaStatement;
use crate::model::Index;

static CREATE_INDEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(UNIQUE\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?({IDENT})\s+ON\s+(?:ONLY\s+)?({QUALIFIED_NAME})"
    ))
    .unwrap()
});

static USING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*USING\s+(\w+)").unwrap());

static WHERE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bWHERE\s+(.+?)\s*;?\s*$").unwrap());

const DEFAULT_INDEX_METHOD: &str = "btree";

/// Extract `CREATE [UNIQUE] INDEX name ON table ...`
pub fn extract_create_index(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = CREATE_INDEX_RE.captures(sql)?;
    let (table_schema, table_name) = split_qualified(&caps[3], search_path);
    let after_table = &sql[caps.get(0)?.end()..];

    let index_method = USING_RE
        .captures(after_table)
        .map(|c| c[1].to_lowercase())
        .unwrap_or_else(|| DEFAULT_INDEX_METHOD.to_string());

    // The predicate can only follow the key list
    let predicate = end_of_first_paren_group(after_table)
        .and_then(|end| WHERE_RE.captures(&after_table[end..]))
        .map(|c| c[1].to_string());

    Some(SchemaStatement::CreateIndex(Index {
        name: unquote(&caps[2]),
        table_schema,
        table_name,
        columns: parse_column_list(after_table),
        is_unique: caps.get(1).is_some(),
        index_method,
        predicate,
    }))
}
