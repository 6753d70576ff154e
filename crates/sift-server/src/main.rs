//! `sift` server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the annotation API over HTTP.
//!
//! # Subcommands
//!
//! ```text
//! sift serve                       # default
//! sift hash-password               # print an argon2 hash for a password on stdin
//! sift add-annotator --id 3        # register annotator 3; password from stdin
//! sift import posts.jsonl          # one {"text": ..., "external_id": ..., "search_term": ...} per line
//! ```

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sift_api::{ApiState, auth::hash_password};
use sift_core::{candidate::NewCandidate, sampler::Sampler, store::AnnotationStore};
use sift_server::ServerConfig;
use sift_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "sift annotation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Register an annotator; the password is read from stdin.
  AddAnnotator {
    #[arg(long)]
    id: i64,
  },
  /// Load candidates from a JSON-lines file.
  Import {
    file: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Serve) {
    Command::HashPassword => {
      let password = read_password()?;
      println!("{}", hash(&password)?);
      Ok(())
    }
    Command::Serve => {
      let (cfg, store) = open(&cli.config).await?;
      serve(store, &cfg).await
    }
    Command::AddAnnotator { id } => {
      let (_, store) = open(&cli.config).await?;
      let password = read_password()?;
      store
        .add_annotator(id, hash(&password)?)
        .await
        .with_context(|| format!("failed to add annotator {id}"))?;
      tracing::info!(annotator_id = id, "annotator registered");
      Ok(())
    }
    Command::Import { file } => {
      let (_, store) = open(&cli.config).await?;
      import(&store, &file).await
    }
  }
}

/// Load configuration and open the SQLite store it names.
async fn open(config_path: &Path) -> anyhow::Result<(ServerConfig, SqliteStore)> {
  let cfg = ServerConfig::load(config_path)
    .with_context(|| format!("failed to load config from {config_path:?}"))?;

  let store_path = cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  Ok((cfg, store))
}

fn hash(password: &str) -> anyhow::Result<String> {
  hash_password(password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))
}

async fn serve(store: SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  let sampler = Sampler::new(cfg.retry_budget);
  let state   = ApiState::new(Arc::new(store), sampler);
  let app     = sift_server::router(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!(retry_budget = sampler.retry_budget(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn import(store: &SqliteStore, file: &Path) -> anyhow::Result<()> {
  let raw = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("reading {}", file.display()))?;

  let mut imported = 0usize;
  for (lineno, line) in raw.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    let input: NewCandidate = serde_json::from_str(line)
      .with_context(|| format!("{}:{}: invalid candidate", file.display(), lineno + 1))?;
    store
      .add_candidate(input)
      .await
      .with_context(|| format!("{}:{}: insert failed", file.display(), lineno + 1))?;
    imported += 1;
  }

  tracing::info!(imported, file = %file.display(), "import finished");
  Ok(())
}

/// Read a password line from stdin. Input is echoed.
fn read_password() -> anyhow::Result<String> {
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
