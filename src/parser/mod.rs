//! pg_dump schema parsing

mod alter_parser;
mod column_parser;
mod constraint_parser;
mod dump_parser;
mod identifier_utils;
mod index_parser;
mod object_parser;
mod sequence_parser;
mod splitter;
mod statement;
mod table_parser;

pub use column_parser::parse_column_definition;
pub use dump_parser::{parse_dump_file, parse_dump_str};
pub use identifier_utils::{
    extract_paren_content, parse_column_list, parse_enum_labels, split_qualified,
    split_top_level_commas, unquote,
};
pub use splitter::{split_statements, DumpStatement, StatementSplitter, DEFAULT_SEARCH_PATH};
pub use statement::{classify, SchemaStatement};
pub use table_parser::{parse_table_body, TableBody};
