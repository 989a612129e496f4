//! Recognized statement kinds and the classifier that produces them
//!
//! Every whitelisted DDL shape becomes one [`SchemaStatement`] variant
//! carrying its extracted fields. Classification is pure; applying a
//! statement to a [`ParsedSchema`](crate::model::ParsedSchema) happens in
//! the dump parser.

use super::alter_parser::{extract_add_identity, extract_set_default};
use super::constraint_parser::extract_add_constraint;
use super::index_parser::extract_create_index;
use super::object_parser::{extract_create_enum, extract_create_extension, extract_create_rule};
use super::sequence_parser::{extract_create_sequence, extract_sequence_owner};
use super::table_parser::extract_create_table;
use crate::model::{Constraint, EnumType, Extension, IdentityKind, Index, Rule, Sequence, Table};
use crate::util::starts_with_ci;

/// A statement shape the dump parser understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatement {
    CreateExtension(Extension),
    CreateEnumType(EnumType),
    CreateSequence(Sequence),
    /// A table together with the constraints declared inside its body
    CreateTable {
        table: Table,
        constraints: Vec<Constraint>,
    },
    AddConstraint(Constraint),
    CreateIndex(Index),
    SetColumnDefault {
        schema: String,
        table: String,
        column: String,
        expression: String,
    },
    AddColumnIdentity {
        schema: String,
        table: String,
        column: String,
        kind: IdentityKind,
    },
    SetSequenceOwner {
        schema: String,
        sequence: String,
        /// `schema.table`
        owner_table: String,
        owner_column: String,
    },
    CreateRule(Rule),
}

impl SchemaStatement {
    /// Short name of the statement kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaStatement::CreateExtension(_) => "CREATE EXTENSION",
            SchemaStatement::CreateEnumType(_) => "CREATE TYPE AS ENUM",
            SchemaStatement::CreateSequence(_) => "CREATE SEQUENCE",
            SchemaStatement::CreateTable { .. } => "CREATE TABLE",
            SchemaStatement::AddConstraint(_) => "ADD CONSTRAINT",
            SchemaStatement::CreateIndex(_) => "CREATE INDEX",
            SchemaStatement::SetColumnDefault { .. } => "SET DEFAULT",
            SchemaStatement::AddColumnIdentity { .. } => "ADD GENERATED AS IDENTITY",
            SchemaStatement::SetSequenceOwner { .. } => "OWNED BY",
            SchemaStatement::CreateRule(_) => "CREATE RULE",
        }
    }
}

type Extractor = fn(&str, &str) -> Option<SchemaStatement>;

/// Extractors in match order; the first that recognizes a statement wins
const EXTRACTORS: &[Extractor] = &[
    extract_create_extension,
    extract_create_enum,
    extract_create_sequence,
    extract_create_table,
    extract_add_constraint,
    extract_create_index,
    extract_set_default,
    extract_add_identity,
    extract_sequence_owner,
    extract_create_rule,
];

/// Classify one complete statement.
///
/// `search_path` resolves unqualified names. Returns `None` for anything
/// outside the recognized set (DML, grants, functions, comments, ...).
pub fn classify(sql: &str, search_path: &str) -> Option<SchemaStatement> {
    let head = sql.trim_start();
    if !starts_with_ci(head, "CREATE") && !starts_with_ci(head, "ALTER") {
        return None;
    }
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(head, search_path))
}
