//! Column definition parsing for `CREATE TABLE` bodies
//!
//! ## Supported Syntax
//!
//! ```sql
//! name type [COLLATE c] [NOT NULL] [DEFAULT expr]
//! name type GENERATED ALWAYS AS (expr) STORED
//! name type [NOT NULL] GENERATED { ALWAYS | BY DEFAULT } AS IDENTITY [( options )]
//! ```
//!
//! The type is everything before the earliest clause keyword, so
//! `numeric(10,2) NOT NULL DEFAULT 0` yields type `numeric(10,2)`. Each
//! clause is then read independently; they can appear together.

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    end_of_first_paren_group, extract_paren_content, mask_single_quoted, unquote, IDENT,
};
use crate::model::{Column, IdentityKind};
use crate::util::starts_with_ci;

static COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?s)^\s*({IDENT})\s+(.+)$")).unwrap());

static NOT_NULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

static DEFAULT_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\s+").unwrap());

static DEFAULT_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^DEFAULT\s+(.+?)(?:\s+NOT\s+NULL|\s+NULL|\s*,?\s*$)").unwrap()
});

static GENERATED_EXPR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bGENERATED\s+ALWAYS\s+AS\s*\(").unwrap());

static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bGENERATED\s+(ALWAYS|BY\s+DEFAULT)\s+AS\s+IDENTITY").unwrap()
});

/// Words that open a table constraint, never a column name
const CONSTRAINT_WORDS: [&str; 6] = [
    "PRIMARY",
    "UNIQUE",
    "FOREIGN",
    "EXCLUDE",
    "CHECK",
    "CONSTRAINT",
];

/// Parse one column definition from a `CREATE TABLE` body segment
pub fn parse_column_definition(segment: &str) -> Option<Column> {
    let segment = segment.trim().trim_end_matches(',').trim();
    if segment.is_empty() || segment.starts_with("--") {
        return None;
    }

    let caps = COLUMN_RE.captures(segment)?;
    let raw_name = caps.get(1)?.as_str();
    if CONSTRAINT_WORDS.iter().any(|w| raw_name.eq_ignore_ascii_case(w)) {
        return None;
    }
    let name = unquote(raw_name);
    let rest = caps.get(2)?.as_str();
    // Clause keywords only count outside string literals
    let masked = mask_single_quoted(rest);

    let default_pos = find_default_clause(&masked);
    let generated = find_generated_expression(rest, &masked);
    let identity = IDENTITY_RE.captures(&masked);
    let not_null = NOT_NULL_RE.find(&masked);

    let type_end = [
        not_null.map(|m| m.start()),
        default_pos,
        generated.as_ref().map(|(start, _)| *start),
        identity.as_ref().and_then(|c| c.get(0)).map(|m| m.start()),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(rest.len());

    let mut column = Column::new(name, rest[..type_end].trim().trim_end_matches(',').trim());
    column.not_null = not_null.is_some();
    column.default_expr = default_pos.and_then(|pos| {
        let value = DEFAULT_VALUE_RE.captures(&masked[pos..])?.get(1)?;
        let expr = &rest[pos + value.start()..pos + value.end()];
        Some(expr.trim().trim_end_matches(',').trim().to_string())
    });
    column.generated_expr = generated.map(|(_, expr)| expr);
    column.identity = identity.and_then(|c| IdentityKind::from_keyword(&c[1]));

    Some(column)
}

/// Byte offset of the `DEFAULT` clause keyword, ignoring `BY DEFAULT` of identity clauses
fn find_default_clause(masked: &str) -> Option<usize> {
    DEFAULT_KEYWORD_RE
        .find_iter(masked)
        .map(|m| m.start())
        .find(|&pos| !preceded_by_keyword_by(masked, pos))
}

fn preceded_by_keyword_by(text: &str, pos: usize) -> bool {
    let before = text[..pos].trim_end().as_bytes();
    let Some(word_start) = before.len().checked_sub(2) else {
        return false;
    };
    let joined_to_word = matches!(
        before[..word_start].last(),
        Some(b) if b.is_ascii_alphanumeric() || *b == b'_'
    );
    before[word_start..].eq_ignore_ascii_case(b"BY") && !joined_to_word
}

/// Start offset and inner expression of `GENERATED ALWAYS AS (expr) STORED`
fn find_generated_expression(rest: &str, masked: &str) -> Option<(usize, String)> {
    let m = GENERATED_EXPR_RE.find(masked)?;
    let from_paren = &rest[m.end() - 1..];
    let group_end = end_of_first_paren_group(from_paren)?;
    if !starts_with_ci(from_paren[group_end..].trim_start(), "STORED") {
        return None;
    }
    let expr = extract_paren_content(from_paren).trim().to_string();
    Some((m.start(), expr))
}
