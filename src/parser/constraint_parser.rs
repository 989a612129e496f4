//! Constraint parsing for PostgreSQL dumps
//!
//! One code path serves both places a constraint can be declared:
//!
//! ```sql
//! ALTER TABLE ONLY public.orders ADD CONSTRAINT orders_pkey PRIMARY KEY (id);
//! ALTER TABLE ONLY public.orders
//!     ADD CONSTRAINT orders_user_fk FOREIGN KEY (user_id) REFERENCES public.users(id) ON DELETE CASCADE;
//! ALTER TABLE public.bookings ADD CONSTRAINT no_overlap EXCLUDE USING gist (room WITH =, during WITH &&);
//! ALTER TABLE public.items ADD CONSTRAINT price_positive CHECK ((price > (0)::numeric));
//! ```
//!
//! and inline in a `CREATE TABLE` body:
//!
//! ```sql
//! CONSTRAINT t_code_key UNIQUE (code) DEFERRABLE INITIALLY DEFERRED
//! PRIMARY KEY (id)
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    extract_paren_content, parse_column_list, split_qualified, unquote, IDENT, QUALIFIED_NAME,
};
use super::statement::SchemaStatement;
use crate::model::{Constraint, ConstraintType, ReferentialAction};

const CONSTRAINT_KEYWORDS: &str = r"PRIMARY\s+KEY|UNIQUE|FOREIGN\s+KEY|EXCLUDE|CHECK";

static ALTER_ADD_CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*ALTER\s+TABLE\s+(?:ONLY\s+)?({QUALIFIED_NAME})\s+ADD\s+CONSTRAINT\s+({IDENT})\s+({CONSTRAINT_KEYWORDS})\b"
    ))
    .unwrap()
});

static CONSTRAINT_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^\s*(?:CONSTRAINT|{CONSTRAINT_KEYWORDS})\b")).unwrap()
});

static CONSTRAINT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\s*CONSTRAINT\s+({IDENT})\s+")).unwrap());

static CONSTRAINT_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\s*({CONSTRAINT_KEYWORDS})\b")).unwrap());

static REFERENCES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\bREFERENCES\s+({QUALIFIED_NAME})\s*")).unwrap()
});

const ACTIONS: &str = r"CASCADE|SET\s+NULL|SET\s+DEFAULT|RESTRICT|NO\s+ACTION";

static ON_DELETE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\bON\s+DELETE\s+({ACTIONS})")).unwrap());

static ON_UPDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\bON\s+UPDATE\s+({ACTIONS})")).unwrap());

static DEFERRABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFERRABLE\b").unwrap());

static NOT_DEFERRABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOT\s+DEFERRABLE\b").unwrap());

static INITIALLY_DEFERRED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINITIALLY\s+DEFERRED\b").unwrap());

/// Whether a `CREATE TABLE` body segment is a table constraint rather than a column
pub fn is_constraint_segment(segment: &str) -> bool {
    CONSTRAINT_SEGMENT_RE.is_match(segment)
}

/// Extract `ALTER TABLE [ONLY] t ADD CONSTRAINT name TYPE ...`
pub fn extract_add_constraint(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let caps = ALTER_ADD_CONSTRAINT_RE.captures(sql)?;
    let (schema, table) = split_qualified(&caps[1], search_path);
    let constraint_type = ConstraintType::from_keyword(&caps[3])?;
    let after_type = &sql[caps.get(3)?.end()..];

    let constraint = build_constraint(
        unquote(&caps[2]),
        constraint_type,
        after_type,
        sql,
        (schema.as_str(), table.as_str()),
        search_path,
    );
    Some(SchemaStatement::AddConstraint(constraint))
}

/// Parse a table constraint from a `CREATE TABLE` body segment.
///
/// Returns `None` when no constraint keyword follows the optional
/// `CONSTRAINT name` prefix.
pub fn parse_inline_constraint(
    segment: &str,
    table: (&str, &str),
    search_path: &str,
) -> Option<Constraint> {
    let (name, rest) = match CONSTRAINT_NAME_RE.captures(segment) {
        Some(caps) => (unquote(&caps[1]), &segment[caps.get(0)?.end()..]),
        None => (String::new(), segment),
    };

    let caps = CONSTRAINT_TYPE_RE.captures(rest)?;
    let constraint_type = ConstraintType::from_keyword(&caps[1])?;
    let after_type = &rest[caps.get(0)?.end()..];

    Some(build_constraint(
        name,
        constraint_type,
        after_type,
        rest,
        table,
        search_path,
    ))
}

/// Fill a constraint from the text after its type keyword.
///
/// `deferral_scope` is the text searched for `DEFERRABLE` / `INITIALLY DEFERRED`.
fn build_constraint(
    name: String,
    constraint_type: ConstraintType,
    after_type: &str,
    deferral_scope: &str,
    (table_schema, table_name): (&str, &str),
    search_path: &str,
) -> Constraint {
    let mut constraint = Constraint::new(name, constraint_type, table_schema, table_name);

    match constraint_type {
        ConstraintType::PrimaryKey | ConstraintType::Unique => {
            constraint.columns = parse_column_list(after_type);
        }
        ConstraintType::ForeignKey => {
            constraint.columns = parse_column_list(after_type);
            parse_foreign_key_target(&mut constraint, after_type, search_path);
        }
        ConstraintType::Check => {
            let expression = extract_paren_content(after_type).trim();
            if !expression.is_empty() {
                constraint.check_expression = Some(expression.to_string());
            }
        }
        ConstraintType::Exclude => {}
    }

    constraint.deferrable =
        DEFERRABLE_RE.is_match(deferral_scope) && !NOT_DEFERRABLE_RE.is_match(deferral_scope);
    constraint.initially_deferred = INITIALLY_DEFERRED_RE.is_match(deferral_scope);

    constraint
}

fn parse_foreign_key_target(constraint: &mut Constraint, after_type: &str, search_path: &str) {
    if let Some(caps) = REFERENCES_RE.captures(after_type) {
        let (ref_schema, ref_table) = split_qualified(&caps[1], search_path);
        constraint.ref_schema = ref_schema;
        constraint.ref_table = ref_table;

        let after_ref = caps.get(0).map_or("", |m| &after_type[m.end()..]);
        if after_ref.starts_with('(') {
            constraint.ref_columns = parse_column_list(after_ref);
        }
    }

    if let Some(action) = ON_DELETE_RE
        .captures(after_type)
        .and_then(|caps| ReferentialAction::from_keyword(&caps[1]))
    {
        constraint.on_delete = action;
    }
    if let Some(action) = ON_UPDATE_RE
        .captures(after_type)
        .and_then(|caps| ReferentialAction::from_keyword(&caps[1]))
    {
        constraint.on_update = action;
    }
}
