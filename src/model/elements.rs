//! Schema model element types

use std::fmt;

use crate::util::find_ci;

/// Identity column kind (`GENERATED { ALWAYS | BY DEFAULT } AS IDENTITY`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    Always,
    ByDefault,
}

impl IdentityKind {
    /// Parse the keyword phrase following `GENERATED`
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match crate::util::normalize_keyword(keyword).as_str() {
            "ALWAYS" => Some(IdentityKind::Always),
            "BY DEFAULT" => Some(IdentityKind::ByDefault),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKind::Always => "ALWAYS",
            IdentityKind::ByDefault => "BY DEFAULT",
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Raw type text as written in the dump (e.g. "numeric(10,2)")
    pub data_type: String,
    pub not_null: bool,
    /// Raw default expression, never evaluated
    pub default_expr: Option<String>,
    pub identity: Option<IdentityKind>,
    /// Expression of a `GENERATED ALWAYS AS (...) STORED` column
    pub generated_expr: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            not_null: false,
            default_expr: None,
            identity: None,
            generated_expr: None,
        }
    }

    /// Sequence named by a `nextval('...')` default, as written (possibly qualified)
    pub fn nextval_sequence(&self) -> Option<&str> {
        let expr = self.default_expr.as_deref()?;
        let start = find_ci(expr, "nextval(")? + "nextval(".len();
        let rest = expr[start..].trim_start().strip_prefix('\'')?;
        let end = rest.find('\'')?;
        Some(&rest[..end])
    }

    /// Whether values come from a sequence, either identity or a nextval() default
    pub fn is_sequence_backed(&self) -> bool {
        self.identity.is_some() || self.nextval_sequence().is_some()
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub schema: String,
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    pub unlogged: bool,
    /// Parent tables from `INHERITS (...)`, as written
    pub inherits: Vec<String>,
    /// Partition strategy text from `PARTITION BY ...` (e.g. "RANGE (created_at)")
    pub partition_by: Option<String>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
            unlogged: false,
            inherits: Vec::new(),
            partition_by: None,
        }
    }

    /// Get the qualified name (e.g., public.users)
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }
}

/// Kind of table constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    PrimaryKey,
    Unique,
    ForeignKey,
    Exclude,
    Check,
}

impl ConstraintType {
    /// Parse the constraint keyword (`PRIMARY KEY`, `UNIQUE`, ...)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match crate::util::normalize_keyword(keyword).as_str() {
            "PRIMARY KEY" => Some(ConstraintType::PrimaryKey),
            "UNIQUE" => Some(ConstraintType::Unique),
            "FOREIGN KEY" => Some(ConstraintType::ForeignKey),
            "EXCLUDE" => Some(ConstraintType::Exclude),
            "CHECK" => Some(ConstraintType::Check),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintType::PrimaryKey => "PRIMARY KEY",
            ConstraintType::Unique => "UNIQUE",
            ConstraintType::ForeignKey => "FOREIGN KEY",
            ConstraintType::Exclude => "EXCLUDE",
            ConstraintType::Check => "CHECK",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Foreign key `ON DELETE` / `ON UPDATE` action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match crate::util::normalize_keyword(keyword).as_str() {
            "NO ACTION" => Some(ReferentialAction::NoAction),
            "RESTRICT" => Some(ReferentialAction::Restrict),
            "CASCADE" => Some(ReferentialAction::Cascade),
            "SET NULL" => Some(ReferentialAction::SetNull),
            "SET DEFAULT" => Some(ReferentialAction::SetDefault),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table constraint, declared inline or through `ALTER TABLE ... ADD CONSTRAINT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Empty for unnamed inline constraints
    pub name: String,
    pub constraint_type: ConstraintType,
    pub table_schema: String,
    pub table_name: String,
    /// Constrained columns (empty for EXCLUDE and CHECK)
    pub columns: Vec<String>,
    // FK-specific
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
    /// Parenthesized expression of a CHECK constraint
    pub check_expression: Option<String>,
    pub deferrable: bool,
    pub initially_deferred: bool,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        constraint_type: ConstraintType,
        table_schema: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            constraint_type,
            table_schema: table_schema.into(),
            table_name: table_name.into(),
            columns: Vec::new(),
            ref_schema: String::new(),
            ref_table: String::new(),
            ref_columns: Vec::new(),
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
            check_expression: None,
            deferrable: false,
            initially_deferred: false,
        }
    }
}

/// Index created by `CREATE INDEX`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub table_schema: String,
    pub table_name: String,
    /// Key columns or expressions, in order
    pub columns: Vec<String>,
    pub is_unique: bool,
    /// Access method, lowercase (btree, gin, gist, ...)
    pub index_method: String,
    /// Partial index predicate (`WHERE ...`)
    pub predicate: Option<String>,
}

/// Sequence created by `CREATE SEQUENCE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub schema: String,
    pub name: String,
    pub data_type: String,
    pub start_value: Option<i64>,
    pub increment: i64,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub cache: Option<i64>,
    pub cycle: bool,
    /// Qualified owning table (schema.table) from `ALTER SEQUENCE ... OWNED BY`
    pub owned_by_table: Option<String>,
    pub owned_by_column: Option<String>,
}

impl Sequence {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            data_type: "bigint".to_string(),
            start_value: None,
            increment: 1,
            min_value: None,
            max_value: None,
            cache: None,
            cycle: false,
            owned_by_table: None,
            owned_by_column: None,
        }
    }
}

/// Installed extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    pub schema: String,
}

/// Enum type; label order is the sort order of the type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub schema: String,
    pub name: String,
    pub labels: Vec<String>,
}

/// Event a rule fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEvent {
    Select,
    Insert,
    Update,
    Delete,
}

impl RuleEvent {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => Some(RuleEvent::Select),
            "INSERT" => Some(RuleEvent::Insert),
            "UPDATE" => Some(RuleEvent::Update),
            "DELETE" => Some(RuleEvent::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleEvent::Select => "SELECT",
            RuleEvent::Insert => "INSERT",
            RuleEvent::Update => "UPDATE",
            RuleEvent::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RuleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite rule (`CREATE RULE`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub schema: String,
    pub table_name: String,
    pub rule_name: String,
    pub event: RuleEvent,
    pub is_instead: bool,
}
