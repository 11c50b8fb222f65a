//! Playback state for one visualizer instance.
//!
//! [`Playback`] is the synchronous half of the controller: it owns the live
//! step producer, the running statistics, and the current settings, and it
//! hands out one step per [`Playback::advance`] call. It never sleeps; the
//! async [`Controller`](crate::Controller) paces calls to `advance` and
//! releases its lock while waiting, so `pause` and `reset` can interleave
//! with a run at any step boundary.
//!
//! Each run gets its own cancellation flag, captured in a [`RunToken`].
//! Pausing or resetting sets the flag of the current run; a fresh `play`
//! installs a new flag, so a loop still waking from an older run observes
//! its own flag and stops without touching the new run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use algoscope_steps::{Algorithm, Step, StepProducer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::VisConfig;
use crate::error::Result;
use crate::input;

/// Slowest speed setting.
pub const MIN_SPEED: u8 = 1;

/// Fastest speed setting.
pub const MAX_SPEED: u8 = 100;

/// Clamp a requested speed to the supported range.
pub fn clamp_speed(speed: u8) -> u8 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Delay held after publishing a step.
///
/// `(1000 - speed * 9.5)` ms, stretched by half again for narrated steps.
pub fn pacing_delay(speed: u8, narrated: bool) -> Duration {
    let base_us = 1_000_000 - u64::from(clamp_speed(speed)) * 9_500;
    let us = if narrated { base_us * 3 / 2 } else { base_us };
    Duration::from_micros(us)
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No producer; showing the raw input array
    Idle,
    /// Actively pulling and pacing steps
    Running,
    /// Producer retained but not being pulled
    Paused,
    /// Producer drained; terminal step shown
    Finished,
}

/// Running counters derived from published steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub comparisons: u64,
    pub swaps: u64,
}

impl Stats {
    /// Count one step: at most one comparison and one swap per step.
    pub fn record(&mut self, step: &Step) {
        if step.is_comparison() {
            self.comparisons += 1;
        }
        if step.is_exchange() {
            self.swaps += 1;
        }
    }
}

/// Handle for one run of the playback loop.
#[derive(Debug, Clone)]
pub struct RunToken {
    run: u64,
    cancel: Arc<AtomicBool>,
}

impl RunToken {
    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

/// Result of asking playback for the next step.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// A step was pulled and should be published, then held for `delay`
    Step { index: u64, step: Step, delay: Duration },
    /// The producer is drained; fired once per run
    Finished { stats: Stats },
    /// The run was paused or superseded; stop pulling
    Halted,
}

/// Playback state machine: Idle → Running ⇄ Paused → Finished.
pub struct Playback {
    algorithm: Algorithm,
    array: Vec<i64>,
    target: Option<i64>,
    speed: u8,
    array_size: usize,
    rng: StdRng,
    producer: Option<StepProducer>,
    cancel: Arc<AtomicBool>,
    run: u64,
    state: PlaybackState,
    latest_step: Step,
    /// End of the pacing hold for `latest_step`
    hold_until: Option<Instant>,
    stats: Stats,
    steps_published: u64,
}

impl Playback {
    /// Create playback from configuration and generate the first array.
    pub fn new(config: &VisConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut playback = Self {
            algorithm: config.algorithm,
            array: Vec::new(),
            target: None,
            speed: clamp_speed(config.speed),
            array_size: input::clamp_size(config.array_size),
            rng,
            producer: None,
            cancel: Arc::new(AtomicBool::new(false)),
            run: 0,
            state: PlaybackState::Idle,
            latest_step: Step::default(),
            hold_until: None,
            stats: Stats::default(),
            steps_published: 0,
        };
        playback.reset(None);
        playback
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn array(&self) -> &[i64] {
        &self.array
    }

    pub fn target(&self) -> Option<i64> {
        self.target
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn array_size(&self) -> usize {
        self.array_size
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Whether a producer is currently held (running or paused).
    pub fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    pub fn latest_step(&self) -> &Step {
        &self.latest_step
    }

    /// When the latest published step may be replaced.
    ///
    /// A run resumed before this instant must wait it out first, so a quick
    /// pause and replay never cuts a step's hold short.
    pub fn hold_until(&self) -> Option<Instant> {
        self.hold_until
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn steps_published(&self) -> u64 {
        self.steps_published
    }

    /// The live array as custom-input text.
    pub fn input_text(&self) -> String {
        input::format_array(&self.array)
    }

    fn cancel_run(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Drop any run and show `array` with nothing highlighted.
    fn invalidate(&mut self, array: Vec<i64>) {
        self.cancel_run();
        self.producer = None;
        self.stats = Stats::default();
        self.steps_published = 0;
        self.latest_step = Step::new(&array);
        self.hold_until = None;
        self.array = array;
        self.state = PlaybackState::Idle;
    }

    /// Cancel any run and start over from `array`, or a freshly generated one.
    ///
    /// Generated arrays are pre-sorted for algorithms that require sorted
    /// input. Search algorithms get a new target drawn from the array.
    pub fn reset(&mut self, array: Option<Vec<i64>>) -> &Step {
        let array = array.unwrap_or_else(|| {
            input::generate_array(
                &mut self.rng,
                self.array_size,
                self.algorithm.requires_sorted_input(),
            )
        });
        self.target = if self.algorithm.is_search() {
            input::pick_target(&mut self.rng, &array)
        } else {
            None
        };
        self.invalidate(array);
        tracing::info!(
            algorithm = %self.algorithm,
            len = self.array.len(),
            target = ?self.target,
            "playback reset"
        );
        &self.latest_step
    }

    /// Replace the array with parsed custom input, verbatim.
    ///
    /// Input without any integers leaves everything untouched.
    pub fn set_custom_input(&mut self, text: &str) -> Result<&Step> {
        let array = input::parse_array(text)?;
        self.invalidate(array);
        tracing::info!(len = self.array.len(), "custom input applied");
        Ok(&self.latest_step)
    }

    /// Select an algorithm; resets playback.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> &Step {
        self.algorithm = algorithm;
        self.reset(None)
    }

    /// Change the generated array size; resets playback.
    pub fn set_array_size(&mut self, size: usize) -> &Step {
        self.array_size = input::clamp_size(size);
        self.reset(None)
    }

    /// Change speed; applies from the next pacing delay.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = clamp_speed(speed);
    }

    /// Set the search target from text; unparsable text clears it.
    pub fn set_target(&mut self, text: &str) {
        self.target = input::parse_target(text);
    }

    /// Start or resume a run.
    ///
    /// Returns `None` while a run is already in progress. A paused run
    /// resumes on the same producer; otherwise a new producer is created from
    /// the current array and target (a missing target searches for `0`).
    pub fn begin(&mut self) -> Option<RunToken> {
        if self.state == PlaybackState::Running {
            return None;
        }
        if self.producer.is_none() {
            let target = self.target.unwrap_or(0);
            self.producer = Some(self.algorithm.producer(&self.array, target));
            tracing::info!(algorithm = %self.algorithm, len = self.array.len(), "run started");
        } else {
            tracing::debug!(steps = self.steps_published, "run resumed");
        }
        self.cancel = Arc::new(AtomicBool::new(false));
        self.run += 1;
        self.state = PlaybackState::Running;
        Some(RunToken {
            run: self.run,
            cancel: Arc::clone(&self.cancel),
        })
    }

    /// Pull the next step for the run identified by `token`.
    pub fn advance(&mut self, token: &RunToken) -> Advance {
        let current = token.run == self.run;
        if token.is_cancelled() || !current {
            if current && self.state == PlaybackState::Running {
                self.state = PlaybackState::Paused;
            }
            tracing::debug!(run = token.run, "cancellation observed");
            return Advance::Halted;
        }

        // Already drained: completion was reported when the producer ran out.
        let Some(producer) = self.producer.as_mut() else {
            return Advance::Halted;
        };

        match producer.next() {
            Some(step) => {
                self.stats.record(&step);
                self.steps_published += 1;
                let delay = pacing_delay(self.speed, step.is_narrated());
                self.latest_step = step.clone();
                self.hold_until = Some(Instant::now() + delay);
                tracing::trace!(index = self.steps_published, ?delay, "step published");
                Advance::Step {
                    index: self.steps_published,
                    step,
                    delay,
                }
            }
            None => {
                self.producer = None;
                self.state = PlaybackState::Finished;
                tracing::info!(
                    algorithm = %self.algorithm,
                    comparisons = self.stats.comparisons,
                    swaps = self.stats.swaps,
                    "run finished"
                );
                Advance::Finished { stats: self.stats }
            }
        }
    }

    /// Request the current run to stop at the next step boundary.
    ///
    /// Keeps the producer and statistics. Returns `false` when nothing is
    /// running.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.cancel_run();
        self.state = PlaybackState::Paused;
        tracing::debug!(steps = self.steps_published, "pause requested");
        true
    }
}

/// Playback status for sending to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub algorithm: Algorithm,
    pub state: PlaybackState,
    pub is_playing: bool,
    pub finished: bool,
    pub stats: Stats,
    pub speed: u8,
    pub array_size: usize,
    pub target: Option<i64>,
    pub steps_published: u64,
    pub input_text: String,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            algorithm: playback.algorithm,
            state: playback.state,
            is_playing: playback.is_playing(),
            finished: playback.is_finished(),
            stats: playback.stats,
            speed: playback.speed,
            array_size: playback.array_size,
            target: playback.target,
            steps_published: playback.steps_published,
            input_text: playback.input_text(),
        }
    }
}
