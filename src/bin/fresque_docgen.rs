//! Fresque Docgen CLI
//!
//! Commands: build, check
//! Logs to stderr; returns non-zero on any failure.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fresque_docgen::{BuildConfig, BuildPipeline, PdfConverter};

#[derive(Parser)]
#[command(name = "fresque-docgen", version)]
#[command(about = "Fresque Docgen - graph, translations and documents from card sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON build configuration; defaults apply to missing keys
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Source data directory (graph_base.json and one directory per language)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Templates directory
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// Language to build; repeat for several. Replaces the configured list.
    #[arg(short, long = "language", global = true)]
    languages: Vec<String>,

    /// Log debug events
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the graph payload, translations and documents
    Build {
        /// Render documents but skip PDF conversion
        #[arg(long)]
        no_convert: bool,
    },

    /// Load and localize every language without writing anything
    Check,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<BuildConfig> {
    let mut config = match &cli.config {
        Some(path) => BuildConfig::load(path)
            .with_context(|| format!("load configuration '{}'", path.display()))?,
        None => BuildConfig::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.templates_dir {
        config.templates_dir = dir.clone();
    }
    if !cli.languages.is_empty() {
        config.languages = cli.languages.clone();
    }
    if let Commands::Build { no_convert: true } = cli.command {
        config.converter = None;
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    let pipeline = BuildPipeline::new(config).context("set up build")?;

    match cli.command {
        Commands::Build { .. } => {
            let report = pipeline.run().context("build failed")?;
            for artifact in &report.artifacts {
                println!("{}  {}", artifact.sha256, artifact.path.display());
            }
        }

        Commands::Check => {
            let localized = pipeline.prepare().context("check failed")?;
            let config = pipeline.config();
            println!(
                "{} cards, {} relations, languages: {}",
                localized.graph.nodes.len(),
                localized.graph.edge_count(),
                config.languages.join(", ")
            );
            if !config.templates_dir.is_dir() {
                tracing::warn!("templates directory {} not found; `build` will fail", config.templates_dir.display());
            }
            if let Some(kind) = config.converter {
                let converter = PdfConverter::new(kind, config.margins);
                if !converter.is_available() {
                    tracing::warn!("{} not found on PATH; `build` will fail at conversion", kind.program());
                }
            }
        }
    }

    Ok(())
}
