//! Algoscope Visualizer
//!
//! Paced, pausable playback of algorithm step sequences, exposed to a
//! presentation layer over HTTP and WebSocket.
//!
//! # Architecture
//!
//! - **Playback**: synchronous state machine owning the live step producer
//! - **Controller**: async loop that paces steps and publishes events
//! - **Input**: random array generation and custom CSV input
//! - **Server**: REST API for controls, WebSocket for the event stream
//!
//! # Usage
//!
//! ```no_run
//! use algoscope_vis::{Controller, VisConfig, VisServer};
//!
//! # async fn run() -> algoscope_vis::Result<()> {
//! let config = VisConfig::from_env()?;
//! let server = VisServer::new(Controller::new(&config));
//! server.serve(config.addr).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod input;
pub mod playback;
mod server;

pub use config::VisConfig;
pub use controller::{Controller, PlayOutcome};
pub use error::{Error, Result};
pub use events::PlaybackEvent;
pub use playback::{Playback, PlaybackState, PlaybackStatus, RunToken, Stats};
pub use server::VisServer;

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_steps::Algorithm;

    #[tokio::test(start_paused = true)]
    async fn every_algorithm_plays_to_completion() {
        for algorithm in Algorithm::ALL {
            let controller = Controller::new(&VisConfig {
                algorithm,
                array_size: 8,
                speed: 100,
                seed: Some(5),
                ..VisConfig::default()
            });
            let outcome = controller.play().await;
            assert!(matches!(outcome, PlayOutcome::Completed(_)), "{algorithm}");

            let last = controller.latest_step().await;
            if algorithm.is_search() {
                // generated targets are always drawn from the array
                assert!(last.found.is_some(), "{algorithm}");
            } else {
                assert!(last.array.windows(2).all(|w| w[0] <= w[1]), "{algorithm}");
            }
        }
    }

    #[tokio::test]
    async fn status_reflects_configuration() {
        let controller = Controller::new(&VisConfig {
            algorithm: Algorithm::Insertion,
            array_size: 3,
            speed: 70,
            seed: Some(1),
            ..VisConfig::default()
        });
        let status = controller.status().await;
        assert_eq!(status.algorithm, Algorithm::Insertion);
        assert_eq!(status.array_size, input::MIN_ARRAY_SIZE);
        assert_eq!(status.speed, 70);
        assert_eq!(status.state, PlaybackState::Idle);
        assert_eq!(status.input_text.split(", ").count(), input::MIN_ARRAY_SIZE);
    }
}
