use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use tripdata_core::{ServiceConfig, SledStore};
use tripdata_indexer::build_service;
use tripdata_server::build_app;

#[derive(Parser)]
struct Args {
    /// Store directory
    #[arg(long, default_value = "./data/store")]
    store: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServiceConfig::load()?;
    let store = SledStore::open(&args.store)?;
    let service = build_service(&config, Arc::new(store))?;
    let admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.trim().is_empty());
    let app: Router = build_app(Arc::new(service), admin_token);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, store = %args.store.display(), "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
