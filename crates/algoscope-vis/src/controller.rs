//! Async playback controller.
//!
//! Wraps [`Playback`] in a shared lock and runs the paced loop: pull a step,
//! publish it, release the lock, wait out the pacing delay, repeat. The lock
//! is never held across a wait, so `pause` and `reset` from other tasks land
//! between steps. Steps are published while the lock is held, which keeps
//! them in producer order.

use std::sync::Arc;
use std::time::Duration;

use algoscope_steps::{Algorithm, Step};
use tokio::sync::{broadcast, RwLock};

use crate::config::VisConfig;
use crate::error::Result;
use crate::events::PlaybackEvent;
use crate::playback::{Advance, Playback, PlaybackState, PlaybackStatus, Stats};

/// Pause before replaying after a finished run.
pub const RESTART_DELAY: Duration = Duration::from_millis(50);

const EVENT_CAPACITY: usize = 1024;

/// How a call to [`Controller::play`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The producer was drained
    Completed(Stats),
    /// The run was paused, reset, or superseded
    Halted,
    /// Another run was already in progress
    AlreadyRunning,
}

/// Shared handle to one visualizer's playback.
#[derive(Clone)]
pub struct Controller {
    playback: Arc<RwLock<Playback>>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl Controller {
    pub fn new(config: &VisConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            playback: Arc::new(RwLock::new(Playback::new(config))),
            events,
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    pub async fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&*self.playback.read().await)
    }

    pub async fn latest_step(&self) -> Step {
        self.playback.read().await.latest_step().clone()
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine; the latest step stays queryable.
        let _ = self.events.send(event);
    }

    fn emit_reset(&self, playback: &Playback) {
        self.emit(PlaybackEvent::Reset {
            step: playback.latest_step().clone(),
            stats: playback.stats(),
            input_text: playback.input_text(),
            target: playback.target(),
        });
    }

    /// Run playback until the producer drains or the run is cancelled.
    ///
    /// After a finished run this restarts with a fresh array. Resuming a
    /// paused run continues on the same producer.
    pub async fn play(&self) -> PlayOutcome {
        let restarted = {
            let mut playback = self.playback.write().await;
            if playback.is_finished() {
                playback.reset(None);
                self.emit_reset(&playback);
                true
            } else {
                false
            }
        };
        if restarted {
            tokio::time::sleep(RESTART_DELAY).await;
        }

        let token = {
            let mut playback = self.playback.write().await;
            match playback.begin() {
                Some(token) => {
                    self.emit(PlaybackEvent::StateChanged { state: PlaybackState::Running });
                    token
                }
                None => return PlayOutcome::AlreadyRunning,
            }
        };

        // A resume may land inside the previous step's hold.
        let hold = self.playback.read().await.hold_until();
        if let Some(deadline) = hold {
            tokio::time::sleep_until(deadline).await;
        }

        loop {
            let delay = {
                let mut playback = self.playback.write().await;
                match playback.advance(&token) {
                    Advance::Step { index, step, delay } => {
                        self.emit(PlaybackEvent::Step {
                            index,
                            step,
                            stats: playback.stats(),
                            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        });
                        delay
                    }
                    Advance::Finished { stats } => {
                        self.emit(PlaybackEvent::StateChanged { state: PlaybackState::Finished });
                        self.emit(PlaybackEvent::Completed {
                            algorithm: playback.algorithm(),
                            stats,
                        });
                        return PlayOutcome::Completed(stats);
                    }
                    Advance::Halted => return PlayOutcome::Halted,
                }
            };
            tokio::time::sleep(delay).await;
        }
    }

    /// Ask the running loop to stop after its current wait.
    pub async fn pause(&self) -> bool {
        let mut playback = self.playback.write().await;
        let paused = playback.pause();
        if paused {
            self.emit(PlaybackEvent::StateChanged { state: PlaybackState::Paused });
        }
        paused
    }

    /// Cancel any run and show `array`, or a freshly generated one.
    pub async fn reset(&self, array: Option<Vec<i64>>) -> Step {
        let mut playback = self.playback.write().await;
        let step = playback.reset(array).clone();
        self.emit_reset(&playback);
        step
    }

    /// Apply custom CSV input; malformed input leaves playback untouched.
    pub async fn set_custom_input(&self, text: &str) -> Result<Step> {
        let mut playback = self.playback.write().await;
        match playback.set_custom_input(text) {
            Ok(step) => {
                let step = step.clone();
                self.emit_reset(&playback);
                Ok(step)
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring custom input");
                Err(e)
            }
        }
    }

    pub async fn set_algorithm(&self, algorithm: Algorithm) -> Step {
        let mut playback = self.playback.write().await;
        let step = playback.set_algorithm(algorithm).clone();
        self.emit_reset(&playback);
        step
    }

    pub async fn set_array_size(&self, size: usize) -> Step {
        let mut playback = self.playback.write().await;
        let step = playback.set_array_size(size).clone();
        self.emit_reset(&playback);
        step
    }

    pub async fn set_speed(&self, speed: u8) {
        self.playback.write().await.set_speed(speed);
    }

    pub async fn set_target(&self, text: &str) {
        self.playback.write().await.set_target(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(algorithm: Algorithm) -> Controller {
        Controller::new(&VisConfig {
            algorithm,
            speed: 100,
            seed: Some(7),
            ..VisConfig::default()
        })
    }

    /// Collect published steps until the run completes.
    async fn steps_until_complete(rx: &mut broadcast::Receiver<PlaybackEvent>) -> Vec<Step> {
        let mut steps = Vec::new();
        loop {
            match rx.recv().await.unwrap() {
                PlaybackEvent::Step { step, .. } => steps.push(step),
                PlaybackEvent::Completed { .. } => return steps,
                _ => {}
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn play_publishes_every_step_in_order() {
        let controller = controller(Algorithm::Bubble);
        controller.reset(Some(vec![5, 3, 8, 1])).await;
        let mut rx = controller.subscribe();

        let outcome = controller.play().await;

        let expected: Vec<_> = Algorithm::Bubble.producer(&[5, 3, 8, 1], 0).collect();
        let comparisons = expected.iter().filter(|s| s.is_comparison()).count() as u64;
        let swaps = expected.iter().filter(|s| s.is_exchange()).count() as u64;
        assert_eq!(outcome, PlayOutcome::Completed(Stats { comparisons, swaps }));
        assert_eq!(steps_until_complete(&mut rx).await, expected);

        let status = controller.status().await;
        assert!(status.finished);
        assert!(!status.is_playing);
        assert_eq!(status.steps_published, expected.len() as u64);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_are_paced_by_speed_and_narration() {
        let controller = controller(Algorithm::Insertion);
        controller.reset(Some(vec![2, 1])).await;
        let mut rx = controller.subscribe();

        let start = tokio::time::Instant::now();
        controller.play().await;
        let elapsed = start.elapsed();

        let mut expected = Duration::ZERO;
        while let Ok(event) = rx.try_recv() {
            if let PlaybackEvent::Step { step, delay_ms, .. } = event {
                let delay = crate::playback::pacing_delay(100, step.is_narrated());
                assert_eq!(delay_ms, delay.as_millis() as u64);
                expected += delay;
            }
        }
        // insertion's shift write is the one unnarrated step
        assert_eq!(expected, Duration::from_millis(4 * 75 + 50));
        assert!(elapsed >= expected);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_then_resume_reproduces_uninterrupted_sequence() {
        let controller = controller(Algorithm::Bubble);
        controller.reset(Some(vec![5, 3, 8, 1])).await;
        let mut rx = controller.subscribe();

        let runner = controller.clone();
        let first = tokio::spawn(async move { runner.play().await });

        let mut seen = Vec::new();
        while seen.len() < 2 {
            if let PlaybackEvent::Step { step, .. } = rx.recv().await.unwrap() {
                seen.push(step);
            }
        }
        assert!(controller.pause().await);
        assert_eq!(first.await.unwrap(), PlayOutcome::Halted);

        let status = controller.status().await;
        assert_eq!(status.state, PlaybackState::Paused);
        assert_eq!(status.steps_published, 2);

        let second = controller.play().await;
        assert!(matches!(second, PlayOutcome::Completed(_)));
        seen.extend(steps_until_complete(&mut rx).await);

        let expected: Vec<_> = Algorithm::Bubble.producer(&[5, 3, 8, 1], 0).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn quick_pause_and_replay_keeps_the_current_hold() {
        let controller = Controller::new(&VisConfig {
            algorithm: Algorithm::Bubble,
            speed: 50,
            seed: Some(7),
            ..VisConfig::default()
        });
        controller.reset(Some(vec![5, 3, 8, 1])).await;
        let mut rx = controller.subscribe();

        let runner = controller.clone();
        let first_run = tokio::spawn(async move { runner.play().await });
        let first = loop {
            if let PlaybackEvent::Step { step, .. } = rx.recv().await.unwrap() {
                break step;
            }
        };
        let shown_at = tokio::time::Instant::now();

        controller.pause().await;
        let runner = controller.clone();
        let second_run = tokio::spawn(async move { runner.play().await });

        loop {
            if let PlaybackEvent::Step { .. } = rx.recv().await.unwrap() {
                break;
            }
        }
        let gap = shown_at.elapsed();
        let hold = crate::playback::pacing_delay(50, first.is_narrated());
        assert_eq!(hold, Duration::from_micros(787_500));
        assert!(gap >= hold, "step replaced after {gap:?}");

        assert_eq!(first_run.await.unwrap(), PlayOutcome::Halted);
        controller.pause().await;
        assert_eq!(second_run.await.unwrap(), PlayOutcome::Halted);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_fires_once_and_not_on_pause_or_reset() {
        let controller = controller(Algorithm::Linear);
        controller.set_custom_input("1, 2, 3").await.unwrap();
        controller.set_target("3").await;
        let mut rx = controller.subscribe();

        let runner = controller.clone();
        let handle = tokio::spawn(async move { runner.play().await });
        while !matches!(rx.recv().await.unwrap(), PlaybackEvent::Step { .. }) {}
        controller.reset(Some(vec![9, 9])).await;
        assert_eq!(handle.await.unwrap(), PlayOutcome::Halted);

        controller.play().await;

        let mut completions = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, PlaybackEvent::Completed { .. }) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn play_after_finish_restarts_with_fresh_run() {
        let controller = controller(Algorithm::Merge);
        controller.reset(Some(vec![3, 1, 2])).await;
        controller.play().await;
        assert!(controller.status().await.finished);

        let mut rx = controller.subscribe();
        let outcome = controller.play().await;
        assert!(matches!(outcome, PlayOutcome::Completed(_)));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, PlaybackEvent::Reset { .. }));
        // regenerated at the configured size
        assert_eq!(first.step().unwrap().array.len(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn second_play_while_running_is_refused() {
        let controller = controller(Algorithm::Selection);
        let mut rx = controller.subscribe();

        let runner = controller.clone();
        let handle = tokio::spawn(async move { runner.play().await });
        while !matches!(rx.recv().await.unwrap(), PlaybackEvent::Step { .. }) {}

        assert_eq!(controller.play().await, PlayOutcome::AlreadyRunning);
        controller.pause().await;
        assert_eq!(handle.await.unwrap(), PlayOutcome::Halted);
    }

    #[tokio::test]
    async fn malformed_input_is_ignored() {
        let controller = controller(Algorithm::Bubble);
        let before = controller.latest_step().await;
        assert!(controller.set_custom_input("abc").await.is_err());
        assert_eq!(controller.latest_step().await, before);
    }

    #[tokio::test]
    async fn settings_publish_reset_events() {
        let controller = controller(Algorithm::Bubble);
        let mut rx = controller.subscribe();

        controller.set_algorithm(Algorithm::Binary).await;
        match rx.recv().await.unwrap() {
            PlaybackEvent::Reset { step, target, .. } => {
                assert!(step.array.windows(2).all(|w| w[0] <= w[1]));
                assert!(target.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }

        controller.set_array_size(5).await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.step().unwrap().array.len(), 5);
    }
}
