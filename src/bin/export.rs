//! Schema Export CLI
//!
//! Loads message definition files and writes the JSON Schema of every
//! message (or of selected root messages and what they reference).

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use message_schemas::config::OutputFormat;
use message_schemas::{MessageCatalog, SchemaConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-export")]
#[command(about = "Convert message definitions into JSON Schema")]
struct Cli {
    /// Definition files or directories (overrides [input] paths)
    inputs: Vec<PathBuf>,

    /// Root message to convert, by definition name (repeatable; default: all)
    #[arg(short, long = "message")]
    messages: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Config file
    #[arg(short, long)]
    config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let config = match SchemaConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: SchemaConfig) -> anyhow::Result<()> {
    let inputs = if cli.inputs.is_empty() {
        config.input.paths
    } else {
        cli.inputs
    };

    let catalog = MessageCatalog::load(&inputs)
        .with_context(|| format!("loading message definitions from {:?}", inputs))?;
    eprintln!("📦 Loaded {} message types", catalog.len());

    let schemas = catalog
        .to_schemas(&cli.messages)
        .context("converting messages to JSON Schema")?;
    eprintln!("📝 Generated {} schemas", schemas.len());

    let format = if cli.compact {
        OutputFormat::Compact
    } else {
        config.output.format
    };
    let mut content = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(&schemas)?,
        OutputFormat::Compact => serde_json::to_string(&schemas)?,
    };
    content.push('\n');

    match cli.output.or(config.output.path) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &content)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("✅ Exported schemas to: {:?}", path);
        }
        None => {
            std::io::stdout().lock().write_all(content.as_bytes())?;
        }
    }

    Ok(())
}
