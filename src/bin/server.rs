use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use garden::api::{self, AppState};
use garden::store::JsonFileStore;
use garden::{GardenConfig, Rng, Sampler};

/// Journal, flower and wallet API for the garden frontend.
#[derive(Parser, Debug)]
#[command(name = "garden-server", version, about)]
struct Cli {
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Serve the built frontend from this directory
    #[arg(long, default_value = "frontend")]
    static_dir: String,

    /// Fixed RNG seed for reproducible placement (default: clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Flower bed radius
    #[arg(long)]
    garden_radius: Option<f64>,

    /// Minimum distance between flowers
    #[arg(long)]
    min_separation: Option<f64>,

    /// Keep journal entries, flowers and the wallet in this JSON file
    /// instead of memory
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(short, long, default_value = "info")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    garden::init_logging(cli.log_level)?;

    let defaults = GardenConfig::default();
    let config = GardenConfig {
        garden_radius: cli.garden_radius.unwrap_or(defaults.garden_radius),
        min_separation: cli.min_separation.unwrap_or(defaults.min_separation),
        ..defaults
    };
    Sampler::flower_bed(&config).validate()?;
    let rng = cli.seed.map(Rng::new).unwrap_or_else(Rng::from_clock);
    info!(
        radius = config.garden_radius,
        min_separation = config.min_separation,
        seed = ?cli.seed,
        "garden configured"
    );

    let state = match &cli.data {
        Some(path) => {
            info!(path = %path.display(), "using file store");
            AppState::with_store(JsonFileStore::open(path)?, config, rng)?
        }
        None => AppState::new(config, rng),
    };
    let state = Arc::new(state);
    let app = api::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .fallback_service(ServeDir::new(&cli.static_dir));

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;
    info!("garden server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
