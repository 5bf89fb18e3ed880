use std::path::PathBuf;
use std::sync::Arc;

use batch_runner::{BatchRunner, RootSelector};
use clap::{Parser, Subcommand};
use country_tagger::{CountryCodeTagger, TaggerConfig};
use curation_core::{CurationTask, TracingReporter};
use memory_repository::{InMemoryRepository, RepositorySnapshot};
use thumbnail_fixer::{ThumbnailConfig, ThumbnailFixer, ThumbnailStrategy};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "curate")]
#[command(about = "Run a curation task over a repository snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add ISO 3166-1 alpha-2 codes for free-text country metadata
    CountryCodes {
        #[command(flatten)]
        target: Target,

        /// Clear existing codes and tag again
        #[arg(long)]
        force_update: bool,

        /// Drop repeated codes before writing
        #[arg(long)]
        deduplicate: bool,
    },

    /// Remove low-quality and duplicate generated thumbnails
    Thumbnails {
        #[command(flatten)]
        target: Target,

        /// Rule set: low-quality or jpg-jpg (default: THUMBNAIL_STRATEGY or low-quality)
        #[arg(long)]
        strategy: Option<ThumbnailStrategy>,
    },
}

#[derive(Debug, clap::Args)]
struct Target {
    /// Repository snapshot (JSON)
    #[arg(long)]
    repository: PathBuf,

    /// Handle of the site, community, collection or item to run on (default: whole site)
    #[arg(long)]
    handle: Option<String>,

    /// Write the updated snapshot to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (task, target): (Box<dyn CurationTask>, Target) = match cli.command {
        Command::CountryCodes {
            target,
            force_update,
            deduplicate,
        } => {
            let mut config = TaggerConfig::from_env()?;
            if force_update {
                config = config.with_force_update(true);
            }
            if deduplicate {
                config = config.with_deduplicate(true);
            }
            (Box::new(CountryCodeTagger::new(config)?), target)
        }
        Command::Thumbnails { target, strategy } => {
            let mut config = ThumbnailConfig::from_env()?;
            if let Some(strategy) = strategy {
                config = config.with_strategy(strategy);
            }
            (Box::new(ThumbnailFixer::new(config)), target)
        }
    };

    let snapshot = RepositorySnapshot::from_path(&target.repository)?;
    info!(path = %target.repository.display(), items = snapshot.items.len(), "Loaded repository snapshot");

    let repository = Arc::new(InMemoryRepository::new(snapshot));
    let runner = BatchRunner::new(repository.clone(), Arc::new(TracingReporter));
    let root = RootSelector::from_option(target.handle.as_deref());

    let summary = runner.run(task.as_ref(), &root).await?;
    println!("{} on {}: {}", task.name(), root, summary);

    if let Some(output) = target.output.as_ref() {
        repository.snapshot().await.write_to_path(output)?;
        info!(path = %output.display(), "Wrote updated snapshot");
    }

    Ok(())
}
