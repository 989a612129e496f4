//! Parsed schema aggregate

use super::{
    is_excluded_schema, Constraint, ConstraintType, EnumType, Extension, IdentityKind, Index,
    Rule, Sequence, Table,
};

/// Complete in-memory representation of a schema-only dump
///
/// Built in a single forward pass; the collections keep dump order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSchema {
    /// Server version from the `Dumped from database version` header, empty if absent
    pub pg_version: String,
    pub tables: Vec<Table>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
    pub sequences: Vec<Sequence>,
    pub extensions: Vec<Extension>,
    pub enum_types: Vec<EnumType>,
    pub rules: Vec<Rule>,
}

impl ParsedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.schema == schema && t.name == name)
    }

    /// Constraints on a table, optionally filtered by type
    pub fn get_constraints_for_table(
        &self,
        schema: &str,
        name: &str,
        constraint_type: Option<ConstraintType>,
    ) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.table_schema == schema && c.table_name == name)
            .filter(|c| match constraint_type {
                Some(t) => c.constraint_type == t,
                None => true,
            })
            .collect()
    }

    pub fn get_indexes_for_table(&self, schema: &str, name: &str) -> Vec<&Index> {
        self.indexes
            .iter()
            .filter(|i| i.table_schema == schema && i.table_name == name)
            .collect()
    }

    pub fn get_sequence(&self, schema: &str, name: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.schema == schema && s.name == name)
    }

    /// Total number of modeled objects across all collections
    pub fn object_count(&self) -> usize {
        self.tables.len()
            + self.constraints.len()
            + self.indexes.len()
            + self.sequences.len()
            + self.extensions.len()
            + self.enum_types.len()
            + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_count() == 0
    }

    // ========================================================================
    // Insertion (excluded schemas are rejected here and nowhere else)
    // ========================================================================

    pub(crate) fn add_table(&mut self, table: Table) -> bool {
        if is_excluded_schema(&table.schema) {
            return false;
        }
        self.tables.push(table);
        true
    }

    pub(crate) fn add_constraint(&mut self, constraint: Constraint) -> bool {
        if is_excluded_schema(&constraint.table_schema) {
            return false;
        }
        self.constraints.push(constraint);
        true
    }

    pub(crate) fn add_index(&mut self, index: Index) -> bool {
        if is_excluded_schema(&index.table_schema) {
            return false;
        }
        self.indexes.push(index);
        true
    }

    pub(crate) fn add_sequence(&mut self, sequence: Sequence) -> bool {
        if is_excluded_schema(&sequence.schema) {
            return false;
        }
        self.sequences.push(sequence);
        true
    }

    /// Extensions are screened by their own name: an extension named after a
    /// system schema (e.g. `spock`) is part of the replication stack, not user surface.
    pub(crate) fn add_extension(&mut self, extension: Extension) -> bool {
        if is_excluded_schema(&extension.name.to_lowercase()) {
            return false;
        }
        self.extensions.push(extension);
        true
    }

    pub(crate) fn add_enum_type(&mut self, enum_type: EnumType) -> bool {
        if is_excluded_schema(&enum_type.schema) {
            return false;
        }
        self.enum_types.push(enum_type);
        true
    }

    pub(crate) fn add_rule(&mut self, rule: Rule) -> bool {
        if is_excluded_schema(&rule.schema) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    // ========================================================================
    // Cross-statement mutation (missing targets are a silent no-op)
    // ========================================================================

    pub(crate) fn set_column_default(
        &mut self,
        schema: &str,
        table: &str,
        column: &str,
        expression: String,
    ) -> bool {
        match self.column_mut(schema, table, column) {
            Some(col) => {
                col.default_expr = Some(expression);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_column_identity(
        &mut self,
        schema: &str,
        table: &str,
        column: &str,
        kind: IdentityKind,
    ) -> bool {
        match self.column_mut(schema, table, column) {
            Some(col) => {
                col.identity = Some(kind);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_sequence_owner(
        &mut self,
        schema: &str,
        name: &str,
        owner_table: String,
        owner_column: String,
    ) -> bool {
        let Some(seq) = self
            .sequences
            .iter_mut()
            .find(|s| s.schema == schema && s.name == name)
        else {
            return false;
        };
        seq.owned_by_table = Some(owner_table);
        seq.owned_by_column = Some(owner_column);
        true
    }

    fn column_mut(
        &mut self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Option<&mut super::Column> {
        if is_excluded_schema(schema) {
            return None;
        }
        self.tables
            .iter_mut()
            .find(|t| t.schema == schema && t.name == table)?
            .column_mut(column)
    }
}
