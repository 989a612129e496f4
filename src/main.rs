use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mm_ready::model::Table;
use mm_ready::{parse_dumps, ParsedSchema};

#[derive(Parser)]
#[command(name = "mm-ready")]
#[command(author, version, about = "Multi-master readiness tooling for PostgreSQL schema dumps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse pg_dump --schema-only files and print what was found
    Inspect {
        /// Schema-only dump files
        #[arg(required = true)]
        dumps: Vec<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { dumps, verbose } => {
            init_logging(verbose)?;

            let schemas = parse_dumps(&dumps)?;
            for (path, schema) in dumps.iter().zip(&schemas) {
                println!("{}", path.display());
                print_inventory(schema);
            }
        }
    }

    Ok(())
}

/// RUST_LOG wins when set; otherwise warn, or debug with --verbose
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn print_inventory(schema: &ParsedSchema) {
    let version = if schema.pg_version.is_empty() {
        "unknown"
    } else {
        schema.pg_version.as_str()
    };
    println!("  PostgreSQL version: {}", version);
    println!(
        "  {} tables, {} constraints, {} indexes, {} sequences, {} extensions, {} enum types, {} rules",
        schema.tables.len(),
        schema.constraints.len(),
        schema.indexes.len(),
        schema.sequences.len(),
        schema.extensions.len(),
        schema.enum_types.len(),
        schema.rules.len()
    );

    for table in &schema.tables {
        print_table(schema, table);
    }

    for extension in &schema.extensions {
        println!("  extension {} (schema {})", extension.name, extension.schema);
    }
    for enum_type in &schema.enum_types {
        println!(
            "  enum {}.{} ({})",
            enum_type.schema,
            enum_type.name,
            enum_type.labels.join(", ")
        );
    }
    for sequence in &schema.sequences {
        let owner = match (&sequence.owned_by_table, &sequence.owned_by_column) {
            (Some(table), Some(column)) => format!(" owned by {}.{}", table, column),
            _ => String::new(),
        };
        println!(
            "  sequence {}.{} {}{}",
            sequence.schema, sequence.name, sequence.data_type, owner
        );
    }
    for rule in &schema.rules {
        println!(
            "  rule {} on {} to {}.{}{}",
            rule.rule_name,
            rule.event,
            rule.schema,
            rule.table_name,
            if rule.is_instead { " (instead)" } else { "" }
        );
    }
}

fn print_table(schema: &ParsedSchema, table: &Table) {
    let mut flags = Vec::new();
    if table.unlogged {
        flags.push("unlogged".to_string());
    }
    if let Some(partition_by) = &table.partition_by {
        flags.push(format!("partitioned by {}", partition_by));
    }
    if !table.inherits.is_empty() {
        flags.push(format!("inherits {}", table.inherits.join(", ")));
    }
    if flags.is_empty() {
        println!("  table {}", table.qualified_name());
    } else {
        println!("  table {} [{}]", table.qualified_name(), flags.join("; "));
    }

    for column in &table.columns {
        let mut line = format!("    {} {}", column.name, column.data_type);
        if column.not_null {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default_expr {
            line.push_str(&format!(" DEFAULT {}", default));
        }
        if let Some(identity) = column.identity {
            line.push_str(&format!(" GENERATED {} AS IDENTITY", identity));
        }
        if let Some(expr) = &column.generated_expr {
            line.push_str(&format!(" GENERATED ALWAYS AS ({}) STORED", expr));
        }
        println!("{}", line);
    }

    for constraint in schema.get_constraints_for_table(&table.schema, &table.name, None) {
        let name = if constraint.name.is_empty() {
            "(unnamed)"
        } else {
            constraint.name.as_str()
        };
        println!(
            "    constraint {} {} ({})",
            name,
            constraint.constraint_type,
            constraint.columns.join(", ")
        );
    }
    for index in schema.get_indexes_for_table(&table.schema, &table.name) {
        println!(
            "    {}index {} using {} ({})",
            if index.is_unique { "unique " } else { "" },
            index.name,
            index.index_method,
            index.columns.join(", ")
        );
    }
}
