use crate::config::effect::EffectConfig;
use crate::controller::disintegration::{DisintegrationController, FrameReport};
use crate::effects::filter::FilterSink;
use crate::foundation::core::Fps;
use crate::foundation::error::{DisintegrateError, DisintegrateResult};
use crate::schedule::activation::ActivationEdge;
use crate::schedule::queue::FrameQueue;
use crossbeam_channel::Receiver;
use rand::Rng;
use rand::rngs::StdRng;
use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, trace};

/// Host-side input to a [`FrameLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    /// New level of the activation signal. Only a rising edge starts a run.
    Activate(bool),
    /// Tear down: cancel any run and stop the loop.
    Shutdown,
}

/// Counters accumulated by a [`FrameLoop`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoopStats {
    /// Display refreshes processed.
    pub frames: u64,
    /// Runs started.
    pub runs_started: u64,
    /// Runs that reached completion (cancelled runs are not counted).
    pub runs_completed: u64,
}

/// Owns a controller and its scheduler, and feeds them frames and activation events.
///
/// `step_frame` and `handle_event` are the whole transition surface; `run` only adds a
/// wall-clock frame source and a channel of events on top of them.
pub struct FrameLoop<F: FilterSink, R: Rng = StdRng> {
    controller: DisintegrationController<F, R>,
    queue: FrameQueue,
    activation: ActivationEdge,
    config: EffectConfig,
    completed: Rc<Cell<u64>>,
    notify: Option<Rc<dyn Fn()>>,
    frames: u64,
}

impl<F: FilterSink, R: Rng> FrameLoop<F, R> {
    /// Loop that starts runs of `config` on every activation edge.
    pub fn new(controller: DisintegrationController<F, R>, config: EffectConfig) -> Self {
        Self {
            controller,
            queue: FrameQueue::new(),
            activation: ActivationEdge::new(),
            config,
            completed: Rc::new(Cell::new(0)),
            notify: None,
            frames: 0,
        }
    }

    /// Call `f` after every completed run.
    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.notify = Some(Rc::new(f));
        self
    }

    /// Borrow the controller.
    pub fn controller(&self) -> &DisintegrationController<F, R> {
        &self.controller
    }

    /// Mutably borrow the controller, e.g. to attach a filter.
    pub fn controller_mut(&mut self) -> &mut DisintegrationController<F, R> {
        &mut self.controller
    }

    /// Config used for the next run.
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Replace the config used for the next run. A run in progress keeps its own.
    pub fn set_config(&mut self, config: EffectConfig) {
        self.config = config;
    }

    /// Counters so far.
    pub fn stats(&self) -> LoopStats {
        LoopStats {
            frames: self.frames,
            runs_started: self.controller.runs_started(),
            runs_completed: self.completed.get(),
        }
    }

    /// Apply one host event at timestamp `now` (ms).
    pub fn handle_event(&mut self, event: LoopEvent, now: f64) -> ControlFlow<()> {
        match event {
            LoopEvent::Activate(level) => {
                if self.activation.observe(level) {
                    let completed = Rc::clone(&self.completed);
                    let notify = self.notify.clone();
                    let started = self.controller.start(
                        &self.config,
                        move || {
                            completed.set(completed.get() + 1);
                            if let Some(n) = notify {
                                n();
                            }
                        },
                        now,
                        &mut self.queue,
                    );
                    trace!(started, now, "activation edge");
                }
                ControlFlow::Continue(())
            }
            LoopEvent::Shutdown => {
                self.shutdown();
                ControlFlow::Break(())
            }
        }
    }

    /// Process one display refresh at timestamp `now` (ms).
    ///
    /// Frame callbacks fire first; deferred callbacks scheduled by them drain before returning.
    pub fn step_frame(&mut self, now: f64) -> Vec<FrameReport> {
        self.frames += 1;
        let mut reports = Vec::new();
        for handle in self.queue.begin_frame() {
            reports.extend(self.controller.fire(handle, now, &mut self.queue));
        }
        while let Some(handle) = self.queue.pop_deferred() {
            reports.extend(self.controller.fire(handle, now, &mut self.queue));
        }
        reports
    }

    /// Cancel any run in progress. Nothing stays scheduled afterwards.
    pub fn shutdown(&mut self) {
        self.controller.cancel(&mut self.queue);
    }

    /// Drive the loop against the wall clock until [`LoopEvent::Shutdown`] or until every event
    /// sender is dropped.
    #[tracing::instrument(skip_all, fields(fps = fps.as_f64()))]
    pub fn run(
        &mut self,
        fps: Fps,
        events: &Receiver<LoopEvent>,
        mut on_frame: impl FnMut(&FrameReport),
    ) -> DisintegrateResult<LoopStats> {
        let ticker = crossbeam_channel::tick(fps.frame_interval());
        let epoch = Instant::now();
        let ms_since = |at: Instant| at.saturating_duration_since(epoch).as_secs_f64() * 1000.0;

        loop {
            crossbeam_channel::select! {
                recv(ticker) -> at => {
                    let at = at.map_err(|e| {
                        DisintegrateError::scheduler(format!("frame source closed: {e}"))
                    })?;
                    for report in self.step_frame(ms_since(at)) {
                        on_frame(&report);
                    }
                }
                recv(events) -> event => {
                    let flow = match event {
                        Ok(event) => self.handle_event(event, ms_since(Instant::now())),
                        Err(_) => {
                            debug!("event channel closed");
                            self.handle_event(LoopEvent::Shutdown, ms_since(Instant::now()))
                        }
                    };
                    if flow.is_break() {
                        break;
                    }
                }
            }
        }

        let stats = self.stats();
        debug!(?stats, "frame loop stopped");
        Ok(stats)
    }
}

impl<F: FilterSink, R: Rng> Drop for FrameLoop<F, R> {
    fn drop(&mut self) {
        self.controller.cancel(&mut self.queue);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/frame_loop.rs"]
mod tests;
