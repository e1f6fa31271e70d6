pub mod api;
pub mod config;
pub mod error;
pub mod garden;
pub mod model;
pub mod placement;
pub mod questionnaire;
pub mod rng;
pub mod scatter;
pub mod store;
pub mod wallet;

pub use config::GardenConfig;
pub use error::{GardenError, Result};
pub use garden::{Garden, Planted};
pub use placement::{Placement, Point2, Region, Sampler, place};
pub use rng::Rng;

/// Install the stderr `tracing` subscriber shared by both binaries.
pub fn init_logging(
    level: tracing::Level,
) -> std::result::Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
