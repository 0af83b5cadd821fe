// reorder - prints the creation order of the bundled schemas
// Configuration comes from REORDER_AUTO_ADD, REORDER_TABLE_PREFIX and REORDER_SINGULAR_TABLE

use std::env;

use anyhow::Context;
use ent_reorder::{
    export::{diff_snapshots, load_snapshot, marshal_schema},
    schemas::{create_schema_registry, validate_schemas},
    Config, NamingStrategy, Ordering, Reorder, SchemaRegistry,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let config = Config::from_env()?;

    match args[1].as_str() {
        "order" => order_cmd(&config, &args[2..])?,
        "export" => export_cmd(&config, &args[2..])?,
        "import" => import_cmd(&args[2..])?,
        "diff" => diff_cmd(&args[2..])?,
        "validate" => validate_cmd()?,
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage: reorder <command>");
    eprintln!("Commands:");
    eprintln!("  order [models...]   - Print tables in creation order");
    eprintln!("  export [models...]  - Print the ordered schemas as JSON");
    eprintln!("  import <file>       - Read a schema snapshot and list its tables");
    eprintln!("  diff <old> <new>    - Compare two schema snapshots");
    eprintln!("  validate            - Validate schema definitions");
}

fn run(config: &Config, registry: &SchemaRegistry, models: &[String]) -> anyhow::Result<Ordering> {
    let models: Vec<&str> = if models.is_empty() {
        registry.model_names().iter().map(String::as_str).collect()
    } else {
        models.iter().map(String::as_str).collect()
    };

    let ordering = Reorder::new(registry, config).add_models(models).parse()?;
    Ok(ordering)
}

fn order_cmd(config: &Config, models: &[String]) -> anyhow::Result<()> {
    let registry = create_schema_registry(NamingStrategy::from(config));
    let ordering = run(config, &registry, models)?;

    for (position, schema) in ordering.ordered_schemas().iter().enumerate() {
        println!("{:>3}. {} ({})", position + 1, schema.table, schema.name);
    }
    for cycle in ordering.cycles() {
        println!("  cycle: {} -> {} ignored", cycle.from, cycle.to);
    }

    Ok(())
}

fn export_cmd(config: &Config, models: &[String]) -> anyhow::Result<()> {
    let registry = create_schema_registry(NamingStrategy::from(config));
    let ordering = run(config, &registry, models)?;

    println!("{}", marshal_schema(ordering.ordered_schemas())?);
    Ok(())
}

fn import_cmd(args: &[String]) -> anyhow::Result<()> {
    let path = args.first().context("import needs a snapshot file")?;
    let records = load_snapshot(path)?;

    for record in &records {
        println!("{} ({} fields)", record.table_name, record.fields.len());
    }
    Ok(())
}

fn diff_cmd(args: &[String]) -> anyhow::Result<()> {
    let (old_path, new_path) = match args {
        [old, new, ..] => (old, new),
        _ => anyhow::bail!("diff needs two snapshot files"),
    };
    let diff = diff_snapshots(&load_snapshot(old_path)?, &load_snapshot(new_path)?);

    if diff.is_empty() {
        println!("Snapshots are identical");
        return Ok(());
    }
    for table in &diff.added_tables {
        println!("+ {}", table);
    }
    for table in &diff.removed_tables {
        println!("- {}", table);
    }
    for change in &diff.changed_tables {
        println!("~ {}", change.table);
        for field in &change.added_fields {
            println!("    + {}", field);
        }
        for field in &change.removed_fields {
            println!("    - {}", field);
        }
        for field in &change.modified_fields {
            println!("    ~ {}", field);
        }
    }
    Ok(())
}

fn validate_cmd() -> anyhow::Result<()> {
    println!("Validating schema definitions...");

    match validate_schemas() {
        Ok(()) => {
            println!("All schemas are valid");
            Ok(())
        }
        Err(errors) => {
            eprintln!("Schema validation failed:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            Err(ent_reorder::ReorderError::Validation(errors).into())
        }
    }
}
