use std::path::PathBuf;

use clap::{Parser, Subcommand};

use arranger::io::catalog_io::{catalog_from_columns, load_catalog, load_config};
use arranger::model::{Column, ColumnCatalog};

#[derive(Parser)]
#[command(name = "arr", about = "Two-pane column arrangement editor", version)]
struct Cli {
    /// Path to a catalog JSON file; omit for the built-in demo catalog
    catalog: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a catalog file without launching the editor
    Inspect { catalog: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect { catalog }) => {
            if let Err(e) = inspect(&catalog) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            if let Err(e) = launch(cli.catalog.as_deref(), cli.config.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn launch(
    catalog_path: Option<&std::path::Path>,
    config_path: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match catalog_path {
        Some(path) => load_catalog(path)?,
        None => demo_catalog()?,
    };
    let config = load_config(config_path)?;
    arranger::tui::run(catalog, &config)
}

fn inspect(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(path)?;
    println!("{} columns", catalog.len());
    for column in catalog.iter() {
        let mut flags = Vec::new();
        if column.required {
            flags.push("required");
        }
        if column.locked {
            flags.push("locked");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        let category = column
            .category
            .as_deref()
            .map(|c| format!("  #{c}"))
            .unwrap_or_default();
        println!("  {:<16} {}{}{}", column.key, column.title, flags, category);
    }
    Ok(())
}

fn demo_catalog() -> Result<ColumnCatalog, Box<dyn std::error::Error>> {
    let columns = vec![
        Column::new("name", "Name").required(),
        Column::new("status", "Status").locked(),
        Column::new("owner", "Owner").with_category("people"),
        Column::new("reviewer", "Reviewer").with_category("people"),
        Column::new("created", "Created").with_category("dates"),
        Column::new("updated", "Updated").with_category("dates"),
        Column::new("due", "Due Date").with_category("dates"),
        Column::new("priority", "Priority"),
        Column::new("revenue", "Revenue").with_category("metrics"),
        Column::new("cost", "Cost").with_category("metrics"),
        Column::new("margin", "Margin").with_category("metrics"),
        Column::new("notes", "Notes"),
    ];
    Ok(catalog_from_columns(columns)?)
}
