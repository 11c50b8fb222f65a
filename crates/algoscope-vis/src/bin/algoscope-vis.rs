//! Algoscope Visualizer Server
//!
//! Serve the playback controller to a presentation layer.
//!
//! Usage: `algoscope-vis [port]`. Everything else comes from `ALGOSCOPE_*`
//! environment variables.

use std::env;

use algoscope_vis::{Controller, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoscope_vis=info,algoscope_steps=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = VisConfig::from_env()?;
    if let Some(arg) = env::args().nth(1) {
        let port: u16 = arg.parse().map_err(|_| format!("invalid port: {arg}"))?;
        config = config.with_port(port);
    }

    tracing::info!(
        algorithm = %config.algorithm,
        array_size = config.array_size,
        speed = config.speed,
        "Starting Algoscope visualizer"
    );

    let server = VisServer::new(Controller::new(&config));
    server.serve(config.addr).await?;

    Ok(())
}
