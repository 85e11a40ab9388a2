//! levelz - LevelZ command line tool
//!
//! Thin driver around the levels crate: validate, reformat, summarize and
//! export level files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use levelz_config::CodecConfig;
use levelz_core::{Coordinate2D, Coordinate3D, Dimension};
use levelz_levels::{AnyLevel, LevelLoader, LevelWriter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "levelz", about = "Read and write LevelZ level files", version)]
struct Cli {
    /// Codec config file (default: ./levelz.conf if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a level and report whether it is valid
    Check {
        path: PathBuf,

        /// Level dimensionality (2 or 3); read from the `type` header when omitted
        #[arg(short, long, value_parser = parse_dimension)]
        dimension: Option<Dimension>,
    },

    /// Rewrite a level in canonical form, one placement per line
    Format {
        path: PathBuf,

        #[arg(short, long, value_parser = parse_dimension)]
        dimension: Option<Dimension>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print header and placement counts
    Stats {
        path: PathBuf,

        #[arg(short, long, value_parser = parse_dimension)]
        dimension: Option<Dimension>,
    },

    /// Print a level as JSON
    Export {
        path: PathBuf,

        #[arg(short, long, value_parser = parse_dimension)]
        dimension: Option<Dimension>,
    },
}

fn parse_dimension(s: &str) -> std::result::Result<Dimension, String> {
    s.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CodecConfig::load_or_default(cli.config.as_deref())
        .context("failed to load codec config")?;
    debug!("Using codec config: {:?}", config);

    match cli.command {
        Commands::Check { path, dimension } => {
            let level = load(&path, dimension, &config)?;
            info!(
                "{}: valid {}D level with {} placements",
                path.display(),
                level.dimension(),
                level.placement_count()
            );
        }
        Commands::Format {
            path,
            dimension,
            output,
        } => {
            let level = load(&path, dimension, &config)?;
            let text = level.write(&LevelWriter::new(&config));
            match output {
                Some(out) => {
                    fs::write(&out, text).with_context(|| format!("failed to write {}", out.display()))?;
                    info!("Wrote {}", out.display());
                }
                None => print!("{}", text),
            }
        }
        Commands::Stats { path, dimension } => {
            let level = load(&path, dimension, &config)?;
            println!("dimension:  {}", level.dimension());
            println!("spawn:      {}", level.spawn_text());
            println!("headers:    {}", level.header_count());
            println!("placements: {}", level.placement_count());
            for (name, count) in level.block_counts() {
                println!("  {:<24} {}", name, count);
            }
        }
        Commands::Export { path, dimension } => {
            let level = load(&path, dimension, &config)?;
            let json = serde_json::to_string_pretty(&level).context("failed to serialize level")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn load(path: &Path, dimension: Option<Dimension>, config: &CodecConfig) -> Result<AnyLevel> {
    let level = match dimension {
        Some(Dimension::Two) => LevelLoader::load_file::<Coordinate2D, _>(path, config).map(AnyLevel::from),
        Some(Dimension::Three) => LevelLoader::load_file::<Coordinate3D, _>(path, config).map(AnyLevel::from),
        None => LevelLoader::load_any(path, config),
    };
    level.with_context(|| format!("failed to load {}", path.display()))
}
