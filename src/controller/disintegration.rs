//! Per-run driver of the disintegration effect.
//!
//! The controller never owns a timer. Every entry point receives the current timestamp and the
//! host's [`FrameScheduler`], and leaves at most one callback scheduled. When that callback fires
//! the host passes its handle back to [`DisintegrationController::fire`].

use crate::animation::phase::{Phase, PhaseClock};
use crate::config::effect::EffectConfig;
use crate::controller::run::{ControllerState, RunState};
use crate::effects::direction::{ChannelPair, Direction};
use crate::effects::filter::{FilterSink, NoiseSettings};
use crate::schedule::queue::{FrameHandle, FrameScheduler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Seeds are drawn uniformly from `[0, SEED_RANGE)`.
pub const SEED_RANGE: u32 = 1000;

/// Invoked once at the end of every run that reaches [`Phase::Complete`].
pub type CompletionCallback = Box<dyn FnOnce()>;

/// What one tick computed and pushed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// 1-based run counter of this controller.
    pub run: u64,
    /// Milliseconds since the run started.
    pub elapsed: f64,
    /// Phase after this tick.
    pub phase: Phase,
    /// Progress through `phase`.
    pub progress: f64,
    /// Normalized intensity.
    pub intensity: f64,
    /// Displacement scale pushed to the filter.
    pub scale: f64,
    /// Channel selectors pushed to the filter, if any.
    pub channels: Option<ChannelPair>,
    /// `false` when no filter was attached and the push was skipped.
    pub pushed: bool,
}

struct ActiveRun {
    id: u64,
    direction: Direction,
    clock: PhaseClock,
    noise: NoiseSettings,
    seed: u32,
    last_elapsed: f64,
    on_complete: Option<CompletionCallback>,
}

/// Drives one disintegration run at a time against a [`FilterSink`].
pub struct DisintegrationController<F, R = StdRng> {
    filter: Option<F>,
    rng: R,
    run: RunState,
    current: Option<ActiveRun>,
    runs_started: u64,
}

impl<F: FilterSink> DisintegrationController<F, StdRng> {
    /// Controller with an attached filter and an entropy-seeded RNG.
    pub fn new(filter: F) -> Self {
        Self::with_rng(Some(filter), StdRng::from_entropy())
    }

    /// Controller whose filter is not mounted yet.
    pub fn unattached() -> Self {
        Self::with_rng(None, StdRng::from_entropy())
    }
}

impl<F: FilterSink, R: Rng> DisintegrationController<F, R> {
    /// Controller with an explicit seed source.
    pub fn with_rng(filter: Option<F>, rng: R) -> Self {
        Self {
            filter,
            rng,
            run: RunState::default(),
            current: None,
            runs_started: 0,
        }
    }

    /// Current run state.
    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    /// Current position in the controller state machine.
    pub fn state(&self) -> ControllerState {
        self.run.controller_state()
    }

    /// `true` while a run is in progress (including a pending finalize).
    pub fn is_active(&self) -> bool {
        self.run.active
    }

    /// Number of runs started so far.
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Seed drawn for the current run.
    pub fn seed(&self) -> Option<u32> {
        self.current.as_ref().map(|r| r.seed)
    }

    /// Borrow the attached filter.
    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Mutably borrow the attached filter.
    pub fn filter_mut(&mut self) -> Option<&mut F> {
        self.filter.as_mut()
    }

    /// Attach (mount) a filter, returning the previous one.
    ///
    /// Mid-run, the new filter receives the run's noise settings and seed immediately; the scale
    /// follows on the next tick.
    pub fn attach_filter(&mut self, mut filter: F) -> Option<F> {
        match &self.current {
            Some(run) => {
                filter.configure_noise(run.noise);
                filter.set_seed(run.seed);
            }
            None => filter.set_scale(0.0),
        }
        self.filter.replace(filter)
    }

    /// Detach (unmount) the filter. Ticks keep running and skip their pushes.
    pub fn detach_filter(&mut self) -> Option<F> {
        self.filter.take()
    }

    /// Begin a run at timestamp `now` (ms).
    ///
    /// Returns `false` and changes nothing when a run is already active.
    pub fn start(
        &mut self,
        config: &EffectConfig,
        on_complete: impl FnOnce() + 'static,
        now: f64,
        sched: &mut impl FrameScheduler,
    ) -> bool {
        if self.run.active {
            trace!(run = self.runs_started, "start ignored: run already active");
            return false;
        }

        let clock = PhaseClock::new(config.timing);
        let noise = config.filter.noise_for(config.direction);
        let seed = self.rng.gen_range(0..SEED_RANGE);

        match self.filter.as_mut() {
            Some(f) => {
                f.set_scale(0.0);
                f.configure_noise(noise);
                f.set_seed(seed);
            }
            None => debug!("filter not attached at start; parameters deferred to attach"),
        }

        self.runs_started += 1;
        let first = sched.request_frame();
        self.run = RunState::started(now, first);
        self.current = Some(ActiveRun {
            id: self.runs_started,
            direction: config.direction,
            clock,
            noise,
            seed,
            last_elapsed: 0.0,
            on_complete: Some(Box::new(on_complete)),
        });

        debug!(
            run = self.runs_started,
            seed,
            direction = %config.direction,
            total_ms = clock.timing().total(),
            "disintegration started"
        );
        true
    }

    /// Route a fired callback. Handles that are not the one currently scheduled are ignored.
    pub fn fire(
        &mut self,
        handle: FrameHandle,
        now: f64,
        sched: &mut impl FrameScheduler,
    ) -> Option<FrameReport> {
        if self.run.frame_handle != Some(handle) {
            trace!(handle = handle.id(), "stale callback ignored");
            return None;
        }
        self.run.frame_handle = None;

        if self.run.phase == Phase::Complete {
            self.finalize(sched);
            None
        } else {
            self.tick(now, sched)
        }
    }

    /// Advance the run to timestamp `now` and push the resulting parameters.
    ///
    /// Schedules either the next frame or, once the timeline is complete, a deferred finalize.
    pub fn tick(&mut self, now: f64, sched: &mut impl FrameScheduler) -> Option<FrameReport> {
        if !self.run.active || self.run.phase == Phase::Complete {
            return None;
        }
        let (Some(start), Some(run)) = (self.run.start_time, self.current.as_mut()) else {
            return None;
        };

        let raw = now - start;
        let elapsed = if raw.is_nan() {
            run.last_elapsed
        } else {
            raw.max(run.last_elapsed)
        };
        run.last_elapsed = elapsed;

        let sample = run.clock.sample(elapsed);
        let intensity = sample.intensity();
        let scale = run.clock.scale_for(intensity);
        let channels = run.direction.channels();

        if sample.phase > self.run.phase {
            debug!(run = run.id, from = ?self.run.phase, to = ?sample.phase, elapsed, "phase");
            self.run.phase = sample.phase;
        }

        let pushed = match self.filter.as_mut() {
            Some(f) => {
                f.set_scale(scale);
                if let Some(pair) = channels {
                    f.set_channels(pair);
                }
                true
            }
            None => {
                trace!(run = run.id, "filter not attached; push skipped");
                false
            }
        };

        if let Some(stale) = self.run.frame_handle.take() {
            sched.cancel(stale);
        }
        self.run.frame_handle = Some(if self.run.phase == Phase::Complete {
            sched.defer()
        } else {
            sched.request_frame()
        });

        Some(FrameReport {
            run: run.id,
            elapsed,
            phase: sample.phase,
            progress: sample.progress,
            intensity,
            scale,
            channels,
            pushed,
        })
    }

    /// End the current run: neutral filter, idle state, completion callback.
    pub fn finalize(&mut self, sched: &mut impl FrameScheduler) {
        if !self.run.active {
            return;
        }
        if let Some(h) = self.run.frame_handle.take() {
            sched.cancel(h);
        }
        if let Some(f) = self.filter.as_mut() {
            f.set_scale(0.0);
        }

        self.run = RunState::default();
        let Some(mut run) = self.current.take() else {
            return;
        };
        debug!(run = run.id, elapsed = run.last_elapsed, "disintegration complete");
        if let Some(cb) = run.on_complete.take() {
            cb();
        }
    }

    /// Hard stop: release the scheduled callback without finalizing or notifying.
    ///
    /// Idempotent; a no-op when idle.
    pub fn cancel(&mut self, sched: &mut impl FrameScheduler) {
        if let Some(h) = self.run.frame_handle.take() {
            sched.cancel(h);
        }
        if !self.run.active {
            return;
        }
        if let Some(f) = self.filter.as_mut() {
            f.set_scale(0.0);
        }
        self.run = RunState::default();
        if let Some(run) = self.current.take() {
            let phase = run.clock.sample(run.last_elapsed).phase;
            debug!(run = run.id, ?phase, "disintegration cancelled");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/controller/disintegration.rs"]
mod tests;
