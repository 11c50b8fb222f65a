//! Events published to the presentation layer.

use algoscope_steps::{Algorithm, Step};
use serde::{Deserialize, Serialize};

use crate::playback::{PlaybackState, Stats};

/// Everything the presentation layer needs to follow playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playback was reset to a new input; show the raw array
    Reset {
        step: Step,
        stats: Stats,
        input_text: String,
        target: Option<i64>,
    },

    /// A step was published; hold it onscreen for `delay_ms`
    Step {
        index: u64,
        step: Step,
        stats: Stats,
        delay_ms: u64,
    },

    /// The controller moved between states
    StateChanged { state: PlaybackState },

    /// A run drained its producer
    Completed { algorithm: Algorithm, stats: Stats },
}

impl PlaybackEvent {
    /// The step carried by this event, if any.
    pub fn step(&self) -> Option<&Step> {
        match self {
            PlaybackEvent::Reset { step, .. } | PlaybackEvent::Step { step, .. } => Some(step),
            PlaybackEvent::StateChanged { .. } | PlaybackEvent::Completed { .. } => None,
        }
    }
}
