//! attest-indexer server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, then serves the query API and runs ingestion side by side.
//! The process exits non-zero if ingestion halts on an error.

use std::{
  future::IntoFuture as _,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use attest_indexer::{Indexer, RetryPolicy, config::IndexerConfig, rpc::RpcChain};
use attest_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Attestation indexer and query API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("ATTEST")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let cfg: IndexerConfig = settings
    .try_deserialize()
    .context("failed to deserialise IndexerConfig")?;

  let registry = Arc::new(cfg.registry().context("invalid schema table")?);

  // Expand `~` in store path.
  let store_path = expand_tilde(&cfg.store_path);

  // Open SQLite store.
  let store = Arc::new(
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?,
  );

  // Chain access.
  let chain = RpcChain::new(&cfg.chain.rpc_url, cfg.chain.contract)
    .context("failed to build rpc client")?;
  let mut source = chain.events(
    cfg.chain.start_block,
    cfg.chain.confirmations,
    cfg.chain.batch_size,
  );
  let indexer = Indexer::new(registry, store.clone(), chain, RetryPolicy::from(&cfg.retry))
    .with_poll_interval(cfg.poll_interval());

  let app = attest_api::api_router(store, cfg.api()).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tokio::select! {
    served = axum::serve(listener, app).into_future() => served.context("server error")?,
    ingested = indexer.run(&mut source) => ingested.context("ingestion halted")?,
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
