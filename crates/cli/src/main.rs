mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use piratesearch_core::{
    load_config, load_config_or_default, validate_config, ApibaySearcher, DatasetStore,
    HttpProber, IndexSearcher, LinkProber, Session, SessionSettings,
};

use console::StdConsole;

/// Config file used when `PIRATESEARCH_CONFIG` is not set
const DEFAULT_CONFIG_PATH: &str = "piratesearch.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so they never mix with the prompts
    let json_logs = std::env::var("PIRATESEARCH_LOG_JSON").is_ok_and(|v| v == "1");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    // An explicit config path must exist; the default one is optional
    let config = match std::env::var("PIRATESEARCH_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        Err(_) => load_config_or_default(&PathBuf::from(DEFAULT_CONFIG_PATH))
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))?,
    };

    validate_config(&config).context("Configuration validation failed")?;
    info!(api = %config.api.url, datasets = ?config.datasets.dir, "Configuration loaded");

    let searcher: Arc<dyn IndexSearcher> = Arc::new(
        ApibaySearcher::new(&config.api, config.fetch.max_results)
            .context("Failed to create index client")?,
    );
    let prober: Arc<dyn LinkProber> =
        Arc::new(HttpProber::new(&config.probe).context("Failed to create link prober")?);

    let mut session = Session::new(
        StdConsole::new(),
        searcher,
        prober,
        DatasetStore::new(config.datasets.dir.clone()),
        SessionSettings::from(&config),
    );
    session.run().await.context("Session ended early")?;

    info!("Session finished");
    Ok(())
}
