use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use billboard_patcher::{
    atlas::{extract_billboards, Atlas},
    config::Config,
    frame::{Backdrop, FrameStyleRegistry, Thickness},
    patcher::{PatchEngine, PatchJob},
    raster::FitMode,
};

#[derive(Parser)]
#[command(
    name = "billboard-patcher",
    version,
    about = "Swap billboard artwork in a game spritesheet, keeping the frames",
    long_about = "Billboard Patcher replaces the artwork inside named billboard rectangles of a pre-rendered spritesheet. The new image is resized into the billboard interior and the original border ring is laid back on top."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Composite new artwork into billboards
    Patch {
        /// CONTENT BILLBOARD pairs, e.g. `invopay.png BILLBOARD06`
        pairs: Vec<String>,

        /// Atlas file to patch (repeatable; defaults to the configured targets)
        #[arg(short, long)]
        atlas: Vec<PathBuf>,

        /// Border thickness in pixels, or "detect"
        #[arg(short, long)]
        thickness: Option<Thickness>,

        /// Frame style (reference, pixel-art)
        #[arg(short, long)]
        style: Option<String>,

        /// How artwork is fitted into the interior
        #[arg(long, value_enum)]
        fit: Option<FitMode>,

        /// What shows behind transparent artwork
        #[arg(long, value_enum)]
        backdrop: Option<Backdrop>,

        /// Directory of pristine `<NAME>.png` billboards to take frames from
        #[arg(short, long)]
        reference_dir: Option<PathBuf>,

        /// Back up each atlas before overwriting it
        #[arg(short, long)]
        backup: bool,
    },

    /// Save billboards from an atlas as individual PNG files
    Extract {
        /// Billboards to extract (all when omitted)
        names: Vec<String>,

        /// Atlas to read from
        #[arg(short, long)]
        atlas: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "extracted_billboards")]
        out: PathBuf,
    },

    /// Show the configured billboards and frame styles
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting billboard-patcher v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Patch {
            pairs,
            atlas,
            thickness,
            style,
            fit,
            backdrop,
            reference_dir,
            backup,
        } => {
            if let Some(thickness) = thickness {
                config.frame.thickness = thickness;
            }
            if let Some(style) = style {
                config.frame.style = style;
            }
            if let Some(fit) = fit {
                config.fit.mode = fit;
            }
            if let Some(backdrop) = backdrop {
                config.fit.backdrop = backdrop;
            }
            if reference_dir.is_some() {
                config.targets.reference_dir = reference_dir;
            }
            config.targets.backup |= backup;
            config.validate().context("invalid configuration")?;

            let jobs = if pairs.is_empty() {
                config.jobs.clone()
            } else {
                PatchJob::parse_pairs(&pairs)?
            };
            if jobs.is_empty() {
                bail!("nothing to do: pass CONTENT BILLBOARD pairs or add [[jobs]] to the configuration");
            }

            let atlases = if atlas.is_empty() {
                config.targets.atlases.clone()
            } else {
                atlas
            };

            let engine = PatchEngine::from_config(config).map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let report = engine.run(&jobs, &atlases)?;

            for failure in &report.failures {
                warn!("{} <- {:?}: {}", failure.job.billboard, failure.job.content, failure.reason);
            }
            info!(
                "Updated {} billboard(s) across {} atlas file(s)",
                report.applied,
                report.atlases_written.len()
            );
        }

        Command::Extract { names, atlas, out } => {
            config.validate().context("invalid configuration")?;
            let atlas = Atlas::open(&atlas).map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let written = extract_billboards(&config, &atlas, &names, &out)?;
            info!("Extracted {} billboard(s) to {:?}", written.len(), out);
        }

        Command::List => {
            println!("Billboards:");
            for (name, rect) in &config.billboards {
                println!("  {}: {}", name, rect);
            }

            println!("\nFrame styles:");
            let registry = FrameStyleRegistry::new();
            for name in registry.available_styles() {
                if let Some(style) = registry.get_style(&name) {
                    println!("  {}: {}", name, style.description());
                }
            }
        }
    }

    Ok(())
}
