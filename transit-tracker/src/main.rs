use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use transit_tracker::config::{ConfigError, ServerConfig};
use transit_tracker::topology::TopologyError;
use transit_tracker::tracking::{self, Tracker, VehicleSource};
use transit_tracker::trimet::{
    MockTrimetClient, RouteConfigResponse, TrimetClient, TrimetConfig, TrimetError,
    convert_route_config,
};
use transit_tracker::web::{AppState, create_router};

/// Anything that stops the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load route configuration: {0}")]
    Upstream(#[from] TrimetError),

    #[error("invalid route configuration: {0}")]
    Topology(#[from] TopologyError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    // Fetch the route configuration up front (fail fast if unavailable)
    match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving mock TriMet data");
            let client = MockTrimetClient::new(dir)?;
            let routes = client.get_route_config().await?;
            serve(&config, &routes, client).await
        }
        None => {
            if config.app_id.is_empty() {
                warn!("TRIMET_APP_ID not set. API calls will fail.");
            }
            let client = TrimetClient::new(TrimetConfig::new(&config.app_id))?;
            info!("fetching route configuration");
            let routes = client.get_route_config().await?;
            serve(&config, &routes, client).await
        }
    }
}

async fn serve<S: VehicleSource>(
    config: &ServerConfig,
    routes: &RouteConfigResponse,
    source: S,
) -> Result<(), StartupError> {
    let topology = Arc::new(convert_route_config(routes)?);
    info!(
        routes = topology.route_count(),
        stops = topology.stop_index().len(),
        "topology loaded"
    );

    let (tracker, _poll_loop) = tracking::spawn(
        Tracker::new(Arc::clone(&topology)),
        Arc::new(source),
        config.tracker.clone(),
    );

    let app = create_router(AppState::new(topology, tracker));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "transit tracker listening");
    info!("  GET /health            - Health check");
    info!("  GET /search?stopId=    - Stop lookup");
    info!("  GET /status            - Poll loop status");
    info!("  GET /ws                - follow_stop events");

    axum::serve(listener, app).await?;
    Ok(())
}
