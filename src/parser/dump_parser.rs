//! Schema-only dump parsing
//!
//! One forward pass: split the dump into statements, classify each against
//! the search path in effect, and apply what was recognized to a
//! [`ParsedSchema`]. Mutations that arrive after creation (column defaults,
//! identity, sequence ownership) update the existing entity in place.

use std::path::Path;

use anyhow::Result;
use encoding_rs::UTF_8;

use super::splitter::StatementSplitter;
use super::statement::{classify, SchemaStatement};
use crate::error::MmReadyError;
use crate::model::ParsedSchema;

/// Parse dump text into a schema model
pub fn parse_dump_str(text: &str) -> ParsedSchema {
    let mut schema = ParsedSchema::new();
    let mut splitter = StatementSplitter::new(text);
    let mut statement_count = 0usize;
    let mut recognized = 0usize;

    for statement in splitter.by_ref() {
        statement_count += 1;
        if let Some(parsed) = classify(&statement.sql, &statement.search_path) {
            recognized += 1;
            schema.apply(parsed);
        }
    }

    schema.pg_version = splitter.pg_version().unwrap_or_default().to_string();

    tracing::debug!(
        statements = statement_count,
        recognized,
        pg_version = %schema.pg_version,
        tables = schema.tables.len(),
        constraints = schema.constraints.len(),
        indexes = schema.indexes.len(),
        sequences = schema.sequences.len(),
        extensions = schema.extensions.len(),
        enum_types = schema.enum_types.len(),
        rules = schema.rules.len(),
        "parsed dump"
    );

    schema
}

/// Read and parse a dump file.
///
/// Invalid UTF-8 is replaced rather than rejected; only an unreadable file fails.
pub fn parse_dump_file(path: &Path) -> Result<ParsedSchema> {
    let bytes = std::fs::read(path).map_err(|e| MmReadyError::DumpReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Strips a UTF-8 BOM if present
    let (text, had_errors) = UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        tracing::debug!(path = %path.display(), "replaced invalid UTF-8 sequences");
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "parsing dump");
    Ok(parse_dump_str(&text))
}

impl ParsedSchema {
    /// Apply one recognized statement. Returns false when nothing changed:
    /// the object lives in an excluded schema or the mutation target is missing.
    pub(crate) fn apply(&mut self, statement: SchemaStatement) -> bool {
        let kind = statement.kind();
        let applied = match statement {
            SchemaStatement::CreateExtension(extension) => self.add_extension(extension),
            SchemaStatement::CreateEnumType(enum_type) => self.add_enum_type(enum_type),
            SchemaStatement::CreateSequence(sequence) => self.add_sequence(sequence),
            SchemaStatement::CreateTable { table, constraints } => {
                let added = self.add_table(table);
                if added {
                    for constraint in constraints {
                        self.add_constraint(constraint);
                    }
                }
                added
            }
            SchemaStatement::AddConstraint(constraint) => self.add_constraint(constraint),
            SchemaStatement::CreateIndex(index) => self.add_index(index),
            SchemaStatement::SetColumnDefault {
                schema,
                table,
                column,
                expression,
            } => self.set_column_default(&schema, &table, &column, expression),
            SchemaStatement::AddColumnIdentity {
                schema,
                table,
                column,
                kind,
            } => self.set_column_identity(&schema, &table, &column, kind),
            SchemaStatement::SetSequenceOwner {
                schema,
                sequence,
                owner_table,
                owner_column,
            } => self.set_sequence_owner(&schema, &sequence, owner_table, owner_column),
            SchemaStatement::CreateRule(rule) => self.add_rule(rule),
        };

        if !applied {
            tracing::trace!(kind, "statement skipped");
        }
        applied
    }
}
