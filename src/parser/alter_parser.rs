//! `ALTER TABLE ... ALTER COLUMN` parsing
//!
//! pg_dump emits column defaults and identity columns as separate
//! statements after the table is created:
//!
//! ```sql
//! ALTER TABLE ONLY public.users ALTER COLUMN id SET DEFAULT nextval('public.users_id_seq'::regclass);
//! ALTER TABLE public.events ALTER COLUMN id ADD GENERATED ALWAYS AS IDENTITY (
//!     SEQUENCE NAME public.events_id_seq
//!     START WITH 1
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{split_qualified, unquote, IDENT, QUALIFIED_NAME};
use super::statement::SchemaStatement;
use crate::model::IdentityKind;

static SET_DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*ALTER\s+TABLE\s+(?:ONLY\s+)?({QUALIFIED_NAME})\s+ALTER\s+COLUMN\s+({IDENT})\s+SET\s+DEFAULT\s+(.+?)\s*;?\s*$"
    ))
    .unwrap()
});

static ADD_IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*ALTER\s+TABLE\s+(?:ONLY\s+)?({QUALIFIED_NAME})\s+ALTER\s+COLUMN\s+({IDENT})\s+ADD\s+GENERATED\s+(ALWAYS|BY\s+DEFAULT)\s+AS\s+IDENTITY"
    ))
    .unwrap()
});

/// Extract `ALTER TABLE t ALTER COLUMN c SET DEFAULT expr`
pub fn extract_set_default(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = SET_DEFAULT_RE.captures(sql)?;
    let (schema, table) = split_qualified(&caps[1], search_path);
    let expression = caps[3].trim();
    if expression.is_empty() {
        return None;
    }

    Some(SchemaStatement::SetColumnDefault {
        schema,
        table,
        column: unquote(&caps[2]),
        expression: expression.to_string(),
    })
}

/// Extract `ALTER TABLE t ALTER COLUMN c ADD GENERATED {ALWAYS|BY DEFAULT} AS IDENTITY`
pub fn extract_add_identity(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = ADD_IDENTITY_RE.captures(sql)?;
    let (schema, table) = split_qualified(&caps[1], search_path);

    Some(SchemaStatement::AddColumnIdentity {
        schema,
        table,
        column: unquote(&caps[2]),
        kind: IdentityKind::from_keyword(&caps[3])?,
    })
}
