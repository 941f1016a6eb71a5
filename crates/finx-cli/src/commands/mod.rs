//! Subcommands.

pub mod config;
pub mod invoices;
pub mod settlement;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use finx_core::FinxConfig;
use tracing::debug;

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Default location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finx")
        .join("config.json")
}

/// Load configuration from `path`, else the default location, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<FinxConfig> {
    if let Some(path) = path {
        return Ok(FinxConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        return Ok(FinxConfig::from_file(&default_path)?);
    }

    Ok(FinxConfig::default())
}

/// Write output to a file, or print it to stdout.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
