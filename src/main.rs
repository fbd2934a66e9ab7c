use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use geoapify_gateway::{Endpoints, GeoapifyConfig, ReqwestTransport, logging, web};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("GEOAPIFY_CONFIG").ok())
        .map(PathBuf::from);

    let config = GeoapifyConfig::load_from_path(config_path).context("loading configuration")?;
    logging::init_tracing(&config.logging)?;

    if config.provider.api_key.is_none() {
        warn!("No routing API key configured; callers must pass api_key explicitly");
    }
    if config.provider.autocomplete_key.is_none() {
        warn!("No autocomplete API key configured; autocomplete requests will fail");
    }

    // The blocking client must be built before the async runtime starts
    let transport = Arc::new(ReqwestTransport::new().context("building HTTP client")?);

    let host = config.server.host.clone();
    let port = config.server.port;
    let endpoints = Arc::new(Endpoints::new(Arc::new(config), transport));

    info!("Starting geoapify-gateway {}", geoapify_gateway::VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building async runtime")?;

    runtime.block_on(web::run(web::router(endpoints), &host, port))?;
    Ok(())
}
