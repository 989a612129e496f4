//! Lexical helpers shared by every extractor.
//!
//! These work on raw statement text: identifier unquoting, schema-qualification
//! splitting, balanced-parenthesis extraction and top-level comma splitting.
//! Single-quoted literals and double-quoted identifiers are skipped when
//! counting parentheses or commas, so `DEFAULT 'a,b'::text` or
//! `CHECK (x <> ')')` never disturb the structure.
//!
//! # Examples
//!
//! ```ignore
//! assert_eq!(unquote("\"Order\""), "Order");
//! assert_eq!(split_qualified("app.\"Users\"", "public"), ("app".into(), "Users".into()));
//! assert_eq!(extract_paren_content("UNIQUE (a, b) DEFERRABLE"), "a, b");
//! assert_eq!(split_top_level_commas("a numeric(10,2), b text").len(), 2);
//! ```

use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Regex fragment for one identifier, bare or double-quoted.
pub(crate) const IDENT: &str = r#"(?:"(?:[^"]|"")*"|[\w$]+)"#;

/// Regex fragment for an optionally schema-qualified name.
pub(crate) const QUALIFIED_NAME: &str =
    r#"(?:"(?:[^"]|"")*"|[\w$]+)(?:\.(?:"(?:[^"]|"")*"|[\w$]+))?"#;

/// Strips one layer of surrounding double quotes from an identifier.
///
/// Embedded `""` escapes are left as written.
pub fn unquote(ident: &str) -> String {
    let trimmed = ident.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Splits `schema.name` into `(schema, name)`, unquoting both parts.
///
/// Without a qualifying dot the schema is `default_schema` (the search path
/// in effect for the statement). Dots inside quoted identifiers do not split.
pub fn split_qualified(name: &str, default_schema: &str) -> (String, String) {
    let name = name.trim();
    let mut in_quotes = false;
    for (i, ch) in name.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => return (unquote(&name[..i]), unquote(&name[i + 1..])),
            _ => {}
        }
    }
    (default_schema.to_string(), unquote(name))
}

/// Byte-level scanner state that skips quoted regions.
#[derive(Default)]
struct QuoteState {
    in_single: bool,
    in_double: bool,
}

impl QuoteState {
    /// Feed one character; returns true when the character is structural
    /// (outside any quoted region).
    #[inline]
    fn step(&mut self, ch: char) -> bool {
        match ch {
            '\'' if !self.in_double => {
                self.in_single = !self.in_single;
                false
            }
            '"' if !self.in_single => {
                self.in_double = !self.in_double;
                false
            }
            _ => !self.in_single && !self.in_double,
        }
    }
}

/// Copy of `text` with the inside of every single-quoted literal blanked.
///
/// Byte offsets are unchanged, so matches found in the mask slice the original.
pub(crate) fn mask_single_quoted(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut quotes = QuoteState::default();
    for ch in text.chars() {
        let was_inside = quotes.in_single;
        quotes.step(ch);
        if was_inside && quotes.in_single {
            masked.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        } else {
            masked.push(ch);
        }
    }
    masked
}

/// Returns the text strictly inside the first balanced parenthesis group.
///
/// Nested groups are included verbatim. Returns an empty string when there
/// is no group or it never closes.
pub fn extract_paren_content(text: &str) -> &str {
    let mut depth = 0usize;
    let mut start = None;
    let mut quotes = QuoteState::default();

    for (i, ch) in text.char_indices() {
        if !quotes.step(ch) {
            continue;
        }
        match ch {
            '(' => {
                if depth == 0 {
                    start = Some(i + 1);
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return &text[s..i];
                    }
                }
            }
            _ => {}
        }
    }
    ""
}

/// Byte offset just past the closing parenthesis of the first balanced group.
pub(crate) fn end_of_first_paren_group(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();

    for (i, ch) in text.char_indices() {
        if !quotes.step(ch) {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas at parenthesis depth zero.
///
/// Segments are returned untrimmed; a trailing empty segment is dropped.
pub fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut segment_start = 0;
    let mut quotes = QuoteState::default();

    for (i, ch) in text.char_indices() {
        if !quotes.step(ch) {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[segment_start..i]);
                segment_start = i + 1;
            }
            _ => {}
        }
    }

    if segment_start < text.len() {
        parts.push(&text[segment_start..]);
    }
    parts
}

/// Parses the first parenthetical of `text` as a column list: `(a, "B")` → `["a", "B"]`.
///
/// Expression entries such as `lower((email))` are kept whole. A quoted
/// leading identifier is unquoted before ordering keywords: `"Col" DESC`
/// reads as `Col DESC`.
pub fn parse_column_list(text: &str) -> Vec<String> {
    split_top_level_commas(extract_paren_content(text))
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(unquote_leading)
        .collect()
}

fn unquote_leading(entry: &str) -> String {
    if !entry.starts_with('"') {
        return entry.to_string();
    }
    let bytes = entry.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            let tail = &entry[i + 1..];
            if tail.is_empty() || tail.starts_with(char::is_whitespace) {
                return format!("{}{}", &entry[1..i], tail);
            }
            break;
        }
        i += 1;
    }
    entry.to_string()
}

/// Reads the quoted labels of an enum body (`'a', 'b'`) in order.
///
/// Uses the PostgreSQL tokenizer so doubled quotes and commas inside labels
/// are read exactly; falls back to a plain comma split if tokenizing fails.
pub fn parse_enum_labels(body: &str) -> Vec<String> {
    let dialect = PostgreSqlDialect {};
    match Tokenizer::new(&dialect, body).tokenize() {
        Ok(tokens) => tokens
            .into_iter()
            .filter_map(|token| match token {
                Token::SingleQuotedString(s) | Token::EscapedStringLiteral(s) => Some(s),
                _ => None,
            })
            .collect(),
        Err(_) => body
            .split(',')
            .map(|label| label.trim().trim_matches('\'').to_string())
            .filter(|label| !label.is_empty())
            .collect(),
    }
}
