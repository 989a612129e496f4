//! `CREATE TABLE` parsing
//!
//! ```sql
//! CREATE [UNLOGGED] TABLE [IF NOT EXISTS] schema.name (
//!     column definitions and table constraints
//! ) [INHERITS (parent, ...)] [PARTITION BY strategy (key)];
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::column_parser::parse_column_definition;
use super::constraint_parser::{is_constraint_segment, parse_inline_constraint};
use super::identifier_utils::{
    end_of_first_paren_group, extract_paren_content, split_qualified, split_top_level_commas,
    QUALIFIED_NAME,
};
use super::statement::SchemaStatement;
use crate::model::{Column, Constraint, Table};

static CREATE_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(UNLOGGED\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?({QUALIFIED_NAME})\s*\("
    ))
    .unwrap()
});

static INHERITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*INHERITS\s*\(").unwrap());

static PARTITION_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bPARTITION\s+BY\s+(.+?)\s*;?\s*$").unwrap());

/// Columns and inline constraints of a `CREATE TABLE` body
#[derive(Debug, Default)]
pub struct TableBody {
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

/// Extract `CREATE [UNLOGGED] TABLE ... (...)`
pub fn extract_create_table(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = CREATE_TABLE_RE.captures(sql)?;
    let (schema, name) = split_qualified(&caps[2], search_path);

    let mut table = Table::new(schema, name);
    table.unlogged = caps.get(1).is_some();

    // The match ends on the body's opening parenthesis
    let from_body = &sql[caps.get(0)?.end() - 1..];
    let body = parse_table_body(
        extract_paren_content(from_body),
        (table.schema.as_str(), table.name.as_str()),
        search_path,
    );
    table.columns = body.columns;

    if let Some(body_end) = end_of_first_paren_group(from_body) {
        parse_table_options(&mut table, &from_body[body_end..]);
    }

    Some(SchemaStatement::CreateTable {
        table,
        constraints: body.constraints,
    })
}

/// Split a table body on top-level commas into columns and table constraints
pub fn parse_table_body(body: &str, table: (&str, &str), search_path: &str) -> TableBody {
    let mut parsed = TableBody::default();

    for segment in split_top_level_commas(body) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        if is_constraint_segment(segment) {
            if let Some(constraint) = parse_inline_constraint(segment, table, search_path) {
                parsed.constraints.push(constraint);
            }
            continue;
        }

        if let Some(column) = parse_column_definition(segment) {
            parsed.columns.push(column);
        }
    }

    parsed
}

/// Read `INHERITS (...)` and `PARTITION BY ...` from the text after the body
fn parse_table_options(table: &mut Table, tail: &str) {
    if let Some(m) = INHERITS_RE.find(tail) {
        let parents = extract_paren_content(&tail[m.end() - 1..]);
        table.inherits = split_top_level_commas(parents)
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(caps) = PARTITION_BY_RE.captures(tail) {
        let strategy = caps[1].trim();
        if !strategy.is_empty() {
            table.partition_by = Some(strategy.to_string());
        }
    }
}
