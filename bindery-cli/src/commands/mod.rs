//! CLI command implementations.

pub mod build;
pub mod check;
pub mod init;

pub use build::build_book;
pub use check::check_book;
pub use init::init_project;

use anyhow::{Context, Result};
use bindery_core::Config;
use std::path::{Path, PathBuf};

/// Source directory given on the command line, or the current directory
fn source_root(source: Option<&Path>) -> PathBuf {
    source.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Configuration from `--config`, else `<source>/bindery.yml`, else defaults
fn load_config(source: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => {
            tracing::info!("Loading config from {:?}", path);
            Config::from_file(path).context("Failed to load configuration")
        }
        None => Config::load(source).context("Failed to load configuration"),
    }
}
