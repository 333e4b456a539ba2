//! `cohort` binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite warehouse, and runs one ingestion batch over the data directory.
//! Command-line flags override file and environment settings.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use cohort_ingest::{IngestConfig, Loader};
use cohort_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Frozen-file extract loader for the Cohort warehouse")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Directory containing extract CSVs.
  #[arg(long)]
  data_dir: Option<PathBuf>,

  /// SQLite database path.
  #[arg(long)]
  db: Option<PathBuf>,

  /// Home institution name; transfer rows naming it are skipped.
  #[arg(long)]
  home_institution: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Settings {
  data_dir:         Option<PathBuf>,
  db_path:          Option<PathBuf>,
  home_institution: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration: file, then environment, then CLI flags on top.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("COHORT"))
    .build()
    .context("failed to read config file")?;

  let settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  let data_dir = cli
    .data_dir
    .or(settings.data_dir)
    .context("no data directory given (use --data-dir or set data_dir)")?;
  let db_path = cli
    .db
    .or(settings.db_path)
    .unwrap_or_else(|| PathBuf::from("cohort.db"));
  let home_institution = cli
    .home_institution
    .or(settings.home_institution)
    .unwrap_or_else(|| IngestConfig::default().home_institution);

  // Open the warehouse.
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open warehouse at {db_path:?}"))?;

  tracing::info!(data_dir = %data_dir.display(), db = %db_path.display(), "starting batch");

  let loader = Loader::new(&store, IngestConfig { home_institution });
  let summary = loader
    .run(&data_dir)
    .await
    .context("batch ingestion failed")?;

  for (path, file) in &summary.files {
    tracing::info!(
      file = %path.display(),
      rows = file.rows,
      created = file.created,
      skipped = file.skipped,
      precondition_skips = file.precondition_skips,
      malformed = file.malformed,
      "file summary"
    );
  }

  let totals = summary.totals();
  tracing::info!(
    files = summary.files.len(),
    rows = totals.rows,
    created = totals.created,
    skipped = totals.skipped,
    precondition_skips = totals.precondition_skips,
    malformed = totals.malformed,
    "batch complete"
  );

  Ok(())
}
