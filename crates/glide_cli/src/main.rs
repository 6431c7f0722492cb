//! Glide CLI
//!
//! Runs scripted scroll sessions against a headless windowed list:
//! - `glide init` writes a `glide.toml` with default settings and a demo script
//! - `glide simulate` plays the script and prints one line per frame

mod config;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::SimulationConfig;
use crate::simulate::{OutputFormat, Simulation};

/// Headless simulator for windowed scroll containers
#[derive(Parser, Debug)]
#[command(name = "glide")]
#[command(about = "Headless simulator for windowed scroll containers")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the script in glide.toml and print every frame
    Simulate {
        /// Project directory or config file
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Pace frames with a real timer instead of a simulated clock
        #[arg(long)]
        realtime: bool,
    },

    /// Create a glide.toml with default settings
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing glide.toml
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            path,
            format,
            realtime,
        } => cmd_simulate(path, format, realtime).await,
        Commands::Init { path, force } => cmd_init(path, force),
    }
}

async fn cmd_simulate(path: PathBuf, format: OutputFormat, realtime: bool) -> Result<()> {
    let config = SimulationConfig::load_from_path(&path)?;
    tracing::info!(
        items = config.data.count,
        steps = config.script.steps.len(),
        realtime,
        "starting simulation"
    );

    let out = BufWriter::new(io::stdout().lock());
    let simulation = Simulation::new(config, realtime, format, out)?;
    let out = simulation.run().await?;
    let _out = out
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush output")?;
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<()> {
    let config_path = path.join("glide.toml");
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        );
    }

    fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    fs::write(&config_path, SimulationConfig::example().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    tracing::info!("Created {}", config_path.display());
    Ok(())
}
