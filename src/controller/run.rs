use crate::animation::phase::Phase;
use crate::schedule::queue::FrameHandle;

/// Mutable state of the current run. Reset to [`RunState::default`] when idle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunState {
    /// A run is in progress.
    pub active: bool,
    /// Furthest phase reached so far.
    pub phase: Phase,
    /// Timestamp (ms) passed to `start`.
    pub start_time: Option<f64>,
    /// Callback currently scheduled on the host, if any.
    pub frame_handle: Option<FrameHandle>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            active: false,
            phase: Phase::Initial,
            start_time: None,
            frame_handle: None,
        }
    }
}

impl RunState {
    /// Fresh state for a run started at `now`.
    pub(crate) fn started(now: f64, first_frame: FrameHandle) -> Self {
        Self {
            active: true,
            phase: Phase::Initial,
            start_time: Some(now),
            frame_handle: Some(first_frame),
        }
    }

    /// `true` when no run is in progress and nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Externally visible controller state.
    pub fn controller_state(&self) -> ControllerState {
        if !self.active {
            return ControllerState::Idle;
        }
        match self.phase {
            Phase::Initial => ControllerState::Initial,
            Phase::FadeIn => ControllerState::FadeIn,
            Phase::Hold => ControllerState::Hold,
            Phase::FadeOut => ControllerState::FadeOut,
            Phase::Complete => ControllerState::Complete,
        }
    }
}

/// Controller state machine. `Initial` through `FadeOut` are running; `Complete` is finalizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// No run in progress; the filter is neutral.
    Idle,
    /// Waiting out the initial delay.
    Initial,
    /// Ramping in.
    FadeIn,
    /// Plateau.
    Hold,
    /// Final dissolve.
    FadeOut,
    /// Finalize is scheduled.
    Complete,
}
