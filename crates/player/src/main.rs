//! Armeria Player - terminal client binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use armeria_player::infrastructure::platform::create_platform;
use armeria_player::runner::{config::ClientConfig, run, RunnerDeps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "armeria_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Armeria Player");

    let config = ClientConfig::from_env();
    let platform = create_platform();

    run(RunnerDeps { platform, config }).await
}
