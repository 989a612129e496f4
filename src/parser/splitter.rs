//! Statement splitting for pg_dump output
//!
//! Turns dump text into complete statements, each paired with the
//! `search_path` in effect when it appeared. Works line by line:
//!
//! - `--` comment lines never reach a statement; the first
//!   `-- Dumped from database version X` line sets the server version
//! - blank lines are dropped
//! - `SET search_path = ...` and `SELECT pg_catalog.set_config('search_path', ...)`
//!   update the tracked schema for every later statement
//! - a statement ends on a line ending with `;` outside a dollar-quoted body
//!
//! - rows of a `COPY ... FROM stdin;` data block, up to its `\.` terminator,
//!   are skipped
//!
//! Dollar quoting is a single open/close state: the first `$tag$` on a line
//! opens a body unless the same tag closes again on that line, and the body
//! ends on the next line containing the tag. Nested bodies with different
//! tags are not tracked.

use std::str::Lines;
use std::sync::LazyLock;

use regex::Regex;

/// Schema used for unqualified names before any `search_path` statement.
pub const DEFAULT_SEARCH_PATH: &str = "public";

static PG_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--\s*Dumped from database version (\S+)").unwrap());

static SEARCH_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:SELECT\s+pg_catalog\.set_config\(\s*'search_path'\s*,\s*'([^']*)'|SET\s+search_path\s*(?:=|TO)\s*(.+?)\s*;)",
    )
    .unwrap()
});

static DOLLAR_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\w*\$").unwrap());

static COPY_FROM_STDIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*COPY\s.*\bFROM\s+stdin\b").unwrap());

/// Line ending a `COPY ... FROM stdin` data block
const COPY_DATA_END: &str = "\\.";

/// One complete statement from the dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpStatement {
    /// Statement text, lines joined with `\n`
    pub sql: String,
    /// First user schema of the search path when the statement appeared
    pub search_path: String,
}

/// Lazy, single-pass statement producer over dump text.
///
/// Peak memory is the current statement buffer. The server version is
/// available from [`StatementSplitter::pg_version`] once the header has been
/// consumed.
pub struct StatementSplitter<'a> {
    lines: Lines<'a>,
    buffer: Vec<&'a str>,
    search_path: String,
    in_dollar_quote: bool,
    dollar_tag: String,
    in_copy_data: bool,
    pg_version: Option<String>,
}

impl<'a> StatementSplitter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            buffer: Vec::new(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            in_dollar_quote: false,
            dollar_tag: String::new(),
            in_copy_data: false,
            pg_version: None,
        }
    }

    /// Server version from the dump header, if seen so far
    pub fn pg_version(&self) -> Option<&str> {
        self.pg_version.as_deref()
    }

    /// Current tracked search path
    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    fn take_statement(&mut self) -> DumpStatement {
        let sql = self.buffer.join("\n");
        self.buffer.clear();
        self.in_copy_data = COPY_FROM_STDIN_RE.is_match(&sql);
        DumpStatement {
            sql,
            search_path: self.search_path.clone(),
        }
    }

    fn track_search_path(&mut self, stripped: &str) {
        let Some(caps) = SEARCH_PATH_RE.captures(stripped) else {
            return;
        };
        let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
            return;
        };

        let first_schema = value
            .as_str()
            .split(',')
            .map(|p| p.trim().trim_matches(|c| c == '\'' || c == '"'))
            .find(|p| !p.is_empty() && *p != "pg_catalog" && *p != "$user");

        if let Some(schema) = first_schema {
            tracing::trace!(search_path = schema, "search_path changed");
            self.search_path = schema.to_string();
        }
    }

    fn track_dollar_quote(&mut self, stripped: &str) {
        if !self.in_dollar_quote {
            if let Some(m) = DOLLAR_TAG_RE.find(stripped) {
                let tag = m.as_str();
                // Self-contained when the same tag closes on this line
                if !stripped[m.end()..].contains(tag) {
                    self.in_dollar_quote = true;
                    self.dollar_tag = tag.to_string();
                }
            }
        } else if stripped.contains(self.dollar_tag.as_str()) {
            self.in_dollar_quote = false;
            self.dollar_tag.clear();
        }
    }
}

impl Iterator for StatementSplitter<'_> {
    type Item = DumpStatement;

    fn next(&mut self) -> Option<DumpStatement> {
        while let Some(line) = self.lines.next() {
            let stripped = line.trim();

            if self.in_copy_data {
                if stripped == COPY_DATA_END {
                    self.in_copy_data = false;
                }
                continue;
            }

            if stripped.starts_with("--") {
                if self.pg_version.is_none() {
                    if let Some(caps) = PG_VERSION_RE.captures(stripped) {
                        self.pg_version = Some(caps[1].to_string());
                    }
                }
                continue;
            }

            if stripped.is_empty() {
                continue;
            }

            self.track_search_path(stripped);
            self.track_dollar_quote(stripped);

            self.buffer.push(line);

            if !self.in_dollar_quote && stripped.ends_with(';') {
                return Some(self.take_statement());
            }
        }

        // Truncated dump: flush whatever is left
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.take_statement())
        }
    }
}

/// Split dump text into statements and the header's server version
/// (empty when the header is absent).
pub fn split_statements(text: &str) -> (Vec<DumpStatement>, String) {
    let mut splitter = StatementSplitter::new(text);
    let statements: Vec<DumpStatement> = splitter.by_ref().collect();
    let pg_version = splitter.pg_version().unwrap_or_default().to_string();
    (statements, pg_version)
}
