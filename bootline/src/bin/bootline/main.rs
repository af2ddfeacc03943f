//! `bootline` command-line driver.
//!
//! ```bash
//! # Boot the compiled-in demo units, then walk through two stages
//! bootline run --stage Menu --stage Game
//!
//! # List the unit types compiled into this binary
//! bootline units
//!
//! # Bring a settings file's unit list up to date
//! bootline sync --settings boot.json
//! ```

mod demo;

use anyhow::Context;
use bootline::registry::{discover, sync_descriptors};
use bootline::{
    BootSettings, Orchestrator, SettingsStore, StageId, TransitionOptions, UnitCatalog,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "bootline", version, about = "Boot sequencing and stage transitions")]
struct Cli {
    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Boot, then transition through the given stages in order
    Run {
        /// Settings file; every compiled-in unit runs when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Stage to go to (repeatable)
        #[arg(long = "stage")]
        stages: Vec<String>,

        /// Stage reported active before boot
        #[arg(long)]
        start: Option<String>,

        /// Simulated load time per stage, in milliseconds
        #[arg(long, default_value_t = 250)]
        load_ms: u64,

        /// Show the loading indicator without its animation
        #[arg(long)]
        skip_animation: bool,
    },

    /// List compiled-in boot unit types
    Units,

    /// Rewrite a settings file's unit list from the compiled-in units
    Sync {
        #[arg(short, long)]
        settings: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = match &cli.log_dir {
        Some(dir) => bootline::init_logging_for(dir)?,
        None => {
            bootline::init_logging();
            None
        }
    };

    match cli.command {
        Command::Run {
            settings,
            stages,
            start,
            load_ms,
            skip_animation,
        } => {
            run(
                settings.as_deref(),
                stages,
                start,
                Duration::from_millis(load_ms),
                skip_animation,
            )
            .await
        }
        Command::Units => {
            list_units();
            Ok(())
        }
        Command::Sync { settings } => sync(&settings),
    }
}

async fn run(
    settings_path: Option<&Path>,
    stages: Vec<String>,
    start: Option<String>,
    load_delay: Duration,
    skip_animation: bool,
) -> anyhow::Result<()> {
    let catalog = UnitCatalog::from_inventory();
    let settings = match settings_path {
        Some(path) => BootSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => BootSettings {
            units: discover(&catalog),
            ..Default::default()
        },
    };
    let settings: Arc<dyn SettingsStore> = Arc::new(settings);

    let loader = Arc::new(demo::SimulatedStageLoader::new(
        start.map(StageId::from),
        load_delay,
    ));
    let orchestrator = Orchestrator::builder(settings, loader)
        .catalog(catalog)
        .indicator(Arc::new(demo::ConsoleIndicator::new(Duration::from_millis(300))))
        .build();

    orchestrator.launch().await.context("boot failed")?;
    if let Some(metrics) = orchestrator.boot().metrics() {
        println!(
            "booted {} unit(s) in {}ms",
            metrics.units.len(),
            metrics.total_duration_ms
        );
    }

    let options = TransitionOptions::default().skip_animation(skip_animation);
    for stage in stages {
        orchestrator
            .go_to_with(stage.as_str(), options)
            .await
            .with_context(|| format!("transition to {stage} failed"))?;
    }

    Ok(())
}

fn list_units() {
    let catalog = UnitCatalog::from_inventory();
    if catalog.is_empty() {
        println!("no boot units compiled in");
        return;
    }
    for descriptor in discover(&catalog) {
        match descriptor.priority {
            Some(priority) => println!("{:>6}  {}", priority, descriptor.type_id),
            None => println!("{:>6}  {}", "-", descriptor.type_id),
        }
    }
}

fn sync(path: &Path) -> anyhow::Result<()> {
    let mut settings = if path.exists() {
        BootSettings::load(path).with_context(|| format!("loading {}", path.display()))?
    } else {
        BootSettings::default()
    };

    if sync_descriptors(&mut settings, &UnitCatalog::from_inventory()) {
        settings
            .save(path)
            .with_context(|| format!("saving {}", path.display()))?;
        println!("updated {} ({} units)", path.display(), settings.units.len());
    } else {
        println!("{} is up to date", path.display());
    }
    Ok(())
}
