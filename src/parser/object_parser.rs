//! Extensions, enum types and rules
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE EXTENSION IF NOT EXISTS pgcrypto WITH SCHEMA public;
//! CREATE TYPE public.status AS ENUM ('active', 'inactive');
//! CREATE RULE protect AS ON DELETE TO public.audit DO INSTEAD NOTHING;
//! CREATE OR REPLACE RULE r AS ON UPDATE TO public.t WHERE (new.x > 0) DO ALSO NOTIFY t;
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    extract_paren_content, parse_enum_labels, split_qualified, unquote, IDENT, QUALIFIED_NAME,
};
use super::splitter::DEFAULT_SEARCH_PATH;
use super::statement::SchemaStatement;
use crate::model::{EnumType, Extension, Rule, RuleEvent};

static CREATE_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)^\s*CREATE\s+EXTENSION\s+(?:IF\s+NOT\s+EXISTS\s+)?("(?:[^"]|"")*"|[^\s;]+)(?:\s+(?:WITH\s+)?SCHEMA\s+("(?:[^"]|"")*"|[^\s;]+))?"#,
    )
    .unwrap()
});

static CREATE_ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+TYPE\s+({QUALIFIED_NAME})\s+AS\s+ENUM\s*\("
    ))
    .unwrap()
});

static CREATE_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?RULE\s+({IDENT})\s+AS\s+ON\s+(\w+)\s+TO\s+({QUALIFIED_NAME})\s+(?:WHERE\s+.+?\s+)?DO\s+(INSTEAD\b)?"
    ))
    .unwrap()
});

/// Extract `CREATE EXTENSION [IF NOT EXISTS] name [[WITH] SCHEMA s]`.
///
/// The installing schema defaults to `public`, not the search path.
pub fn extract_create_extension(sql: &str, _search_path: &str) -> Option<SchemaStatement> {
    let caps = CREATE_EXTENSION_RE.captures(sql)?;
    let schema = caps
        .get(2)
        .map(|m| unquote(m.as_str()))
        .unwrap_or_else(|| DEFAULT_SEARCH_PATH.to_string());

    Some(SchemaStatement::CreateExtension(Extension {
        name: unquote(&caps[1]),
        schema,
    }))
}

/// Extract `CREATE TYPE name AS ENUM ('label', ...)`
pub fn extract_create_enum(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = CREATE_ENUM_RE.captures(sql)?;
    let (schema, name) = split_qualified(&caps[1], search_path);
    let from_body = &sql[caps.get(0)?.end() - 1..];

    Some(SchemaStatement::CreateEnumType(EnumType {
        schema,
        name,
        labels: parse_enum_labels(extract_paren_content(from_body)),
    }))
}

/// Extract `CREATE [OR REPLACE] RULE name AS ON event TO table [WHERE ...] DO [INSTEAD]`
pub fn extract_create_rule(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = CREATE_RULE_RE.captures(sql)?;
    let event = RuleEvent::from_keyword(&caps[2])?;
    let (schema, table_name) = split_qualified(&caps[3], search_path);

    Some(SchemaStatement::CreateRule(Rule {
        schema,
        table_name,
        rule_name: unquote(&caps[1]),
        event,
        is_instead: caps.get(4).is_some(),
    }))
}
