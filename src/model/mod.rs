//! Schema model built from a dump

mod elements;
mod parsed_schema;

pub use elements::*;
pub use parsed_schema::ParsedSchema;

/// System schemas whose objects are never modeled.
///
/// Same list as the live-database checks use.
pub const EXCLUDED_SCHEMAS: [&str; 4] = ["pg_catalog", "information_schema", "spock", "pg_toast"];

/// Whether objects in `schema` are excluded from the model
#[inline]
pub fn is_excluded_schema(schema: &str) -> bool {
    EXCLUDED_SCHEMAS.contains(&schema)
}
