mod app;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::state::AppState;
use anyhow::Context;
use clap::Parser;
use knot_cache::MemoryLookupCache;
use knot_shortener::ShortenerService;
use knot_storage::{SqliteSequence, SqliteStore};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gateway", about = "HTTP gateway for the knot URL shortener")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "KNOT_LISTEN", default_value = "127.0.0.1:8000")]
    listen: String,

    /// SQLite database URL.
    #[arg(long, env = "KNOT_DATABASE_URL", default_value = "sqlite://urls.db")]
    database_url: String,

    /// Public base URL used when building short links.
    #[arg(long, env = "KNOT_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let store = SqliteStore::connect(&args.database_url)
        .await
        .context("opening database")?;
    store.init_schema().await.context("initializing schema")?;

    let allocator = SqliteSequence::new(store.pool().clone());
    let service = ShortenerService::new(store, MemoryLookupCache::new(), allocator);
    let state = AppState::new(Arc::new(service), args.base_url);

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    axum::serve(listener, App::router(state)).await?;
    Ok(())
}
