//! Declscope CLI - extract classes and functions with their parents

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "declscope")]
#[command(version)]
#[command(about = "Extract class and function declarations with their enclosing scopes")]
#[command(long_about = r#"
Declscope parses Python and Java sources and lists every class and
function with its line span and the entity that encloses it.

Example usage:
  declscope extract src/app.py
  declscope extract --format json --jobs 4 ./src
  declscope extract --language java Legacy.txt
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract declarations from files or directories
    Extract {
        /// Files or directories to extract
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Force a language instead of guessing from the extension
        #[arg(short, long)]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Dump every recognized node to stderr
        #[arg(long)]
        dump_nodes: bool,

        /// Config file (defaults to ./declscope.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List supported languages
    Languages,

    /// Write a default declscope.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Extract {
            paths,
            language,
            format,
            jobs,
            dump_nodes,
            config,
        } => commands::run_extract(commands::ExtractArgs {
            paths,
            language,
            format,
            jobs,
            dump_nodes,
            config,
        }),
        Commands::Languages => commands::run_languages(),
        Commands::Init { force } => commands::run_init(force),
    }
}
