//! Gateway binary: the in-memory engine behind the HTTP router.

use anyhow::Context;
use std::sync::Arc;
use swap_engine::{EngineConfig, InMemorySwapStorage, SwapService, SystemTimeSource};
use swap_gateway::{AppState, GatewayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = GatewayConfig::from_env().context("loading gateway configuration")?;
    config
        .validate()
        .context("validating gateway configuration")?;

    let engine = SwapService::new(
        InMemorySwapStorage::new(),
        SystemTimeSource,
        EngineConfig::default(),
    );
    let state = AppState::new(Arc::new(engine));

    swap_gateway::serve(&config, state)
        .await
        .context("running gateway server")?;
    Ok(())
}
