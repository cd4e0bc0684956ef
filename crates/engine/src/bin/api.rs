//! worldsim-api - serve the demo HTTP routes.

use std::net::SocketAddr;

use worldsim_engine::api;
use worldsim_engine::infrastructure::{config::EngineConfig, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::load_dotenv_from_repo_root();
    telemetry::init_tracing("worldsim_engine=debug,tower_http=debug");

    let config = EngineConfig::from_env()?;
    let router = api::http::routes();

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
