//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use finx_core::FinxConfig;

use super::{default_config_path, load_config};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(config_path),
    }
}

/// The file `--config`/`FINX_CONFIG` points at, else the default location.
fn effective_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

fn show_config(config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = effective_path(config_path);
    if config_path.is_none() && !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    let profiles: Vec<&str> = config.extraction.profiles.keys().map(String::as_str).collect();
    eprintln!(
        "{} Profiles: {} (default: {})",
        style("ℹ").blue(),
        profiles.join(", "),
        config.extraction.default_profile
    );

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = FinxConfig::default();
    config.validate()?;
    config.save(&output_path)?;

    println!(
        "{} Wrote default configuration ({} entities, {} profiles) to {}",
        style("✓").green(),
        config.extraction.entities.len(),
        config.extraction.profiles.len(),
        output_path.display()
    );

    Ok(())
}

fn show_path(config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = effective_path(config_path);
    let source = if config_path.is_some() {
        "--config / FINX_CONFIG"
    } else {
        "default location"
    };

    println!("Configuration file: {} ({})", path.display(), source);

    match (path.exists(), FinxConfig::from_file(&path)) {
        (false, _) => {
            println!("Status: {}", style("not created").yellow());
            println!();
            println!("Run 'finx config init' to create a configuration file.");
        }
        (true, Ok(_)) => println!("Status: {}", style("valid").green()),
        (true, Err(e)) => println!("Status: {} ({})", style("invalid").red(), e),
    }

    Ok(())
}
