//! Disintegrate drives a timed "dissolve into noise" effect on a UI element.
//!
//! The crate does not render anything itself. It decides, frame by frame, what numeric
//! parameters an external displacement filter should receive:
//!
//! 1. **Classify**: elapsed time + [`TimingConfig`] -> [`PhaseSample`] (pure, [`classify`])
//! 2. **Map**: [`PhaseSample`] -> intensity in `[0, 1]` ([`intensity`])
//! 3. **Push**: intensity -> displacement scale and channel selectors on a [`FilterSink`]
//!
//! [`DisintegrationController`] owns the per-run state and talks to the host only through a
//! [`FrameScheduler`]. [`FrameLoop`] is a ready-made host: a cooperative [`FrameQueue`], a
//! rising-edge activation detector, and a wall-clock frame source.
//!
//! For a walkthrough of the run lifecycle, see [`crate::guide`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod config;
mod controller;
mod effects;
mod foundation;
mod schedule;

/// Standalone walkthrough of the run lifecycle and the host contract.
pub mod guide;

pub use animation::ease::Ease;
pub use animation::phase::{
    FADE_OUT_SPAN, HOLD_INTENSITY, Phase, PhaseClock, PhaseSample, TimingConfig, classify,
    intensity,
};
pub use config::effect::EffectConfig;
pub use controller::disintegration::{
    CompletionCallback, DisintegrationController, FrameReport, SEED_RANGE,
};
pub use controller::run::{ControllerState, RunState};
pub use effects::direction::{ChannelPair, ChannelSelector, Direction, RANDOM_BASE_FREQUENCY};
pub use effects::filter::{
    FilterParams, FilterSink, FilterState, FilterWrite, NoiseSettings, RecordingFilter,
};
pub use foundation::core::{Fps, Vec2};
pub use foundation::error::{DisintegrateError, DisintegrateResult};
pub use schedule::activation::ActivationEdge;
pub use schedule::frame_loop::{FrameLoop, LoopEvent, LoopStats};
pub use schedule::queue::{FrameHandle, FrameQueue, FrameScheduler};
