//! # bindery CLI
//!
//! Command-line interface for the bindery e-book compiler.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bindery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to <SOURCE>/bindery.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new book source tree
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Compile a source tree into an EPUB file
    Build {
        /// Source directory (defaults to current directory)
        source: Option<PathBuf>,

        /// Output file (defaults to <source-dir-name>.epub)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile without writing output and list the planned entries
    Check {
        /// Source directory (defaults to current directory)
        source: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build { source, output } => commands::build_book(
            source.as_deref(),
            output.as_deref(),
            cli.config.as_deref(),
        ),
        Commands::Check { source, json } => {
            commands::check_book(source.as_deref(), cli.config.as_deref(), json)
        }
    }
}
