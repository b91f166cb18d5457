use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ministry_tracker::app::{self, AppState};
use ministry_tracker::clock::SystemClock;
use ministry_tracker::config::{CliArgs, Config};
use ministry_tracker::store::JsonFileStore;
use ministry_tracker::task_store::TaskStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_args(CliArgs::parse())?;

    // Load persisted tasks once; every later mutation writes them back
    let store = TaskStore::open(JsonFileStore::new(&config.data_file), SystemClock);
    let state = AppState::new(store, config.week_start);

    let router = app::app(state, &config.static_dir);

    info!(addr = %config.bind_addr, "server running");
    info!(dir = %config.static_dir.display(), "static files");
    info!(file = %config.data_file.display(), "task data");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
