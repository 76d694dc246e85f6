// Parts Pricing - Web Server
// REST API with Axum over a static catalog

use anyhow::{Context, Result};
use clap::Parser;
use parts_pricing::config::PricingConfig;
use parts_pricing::server::{router, AppState};
use parts_pricing::{init_tracing, CatalogStore};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pricing-server", version, about = "Parts pricing HTTP API")]
struct Args {
    /// Catalog file (.json or .csv)
    #[arg(long, default_value = "data/pecas.json")]
    catalog: PathBuf,

    /// Pricing config file (JSON)
    #[arg(long, env = "PARTS_PRICING_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing("info");

    let config = PricingConfig::load_or_default(args.config.as_deref())?;
    let catalog = CatalogStore::from_file(&args.catalog)?;

    let state = AppState::new(catalog, config.engine());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to address {}", args.bind))?;

    tracing::info!(addr = %args.bind, "server running");
    tracing::info!("API: http://{}/api/quote/<code>", args.bind);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
