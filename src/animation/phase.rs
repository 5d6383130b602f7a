//! Pure timeline math for a single disintegration run.
//!
//! A run is split into four consecutive segments (delay, fade-in, hold, fade-out) followed by the
//! terminal [`Phase::Complete`]. [`classify`] maps elapsed time onto that timeline and
//! [`intensity`] maps the result onto the normalized effect strength.

use crate::animation::ease::ease_in_cubic;
use crate::foundation::core::non_negative_ms;

/// Intensity ceiling reached at the end of fade-in and held until fade-out begins.
pub const HOLD_INTENSITY: f64 = 0.3;

/// Share of full intensity added linearly across the fade-out segment.
pub const FADE_OUT_SPAN: f64 = 0.7;

/// Named segment of a run's timeline. Ordered; never revisited within one run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting out the initial delay.
    Initial,
    /// Ramping in along an ease-in cubic, capped at [`HOLD_INTENSITY`].
    FadeIn,
    /// Holding at [`HOLD_INTENSITY`].
    Hold,
    /// Linear ramp from [`HOLD_INTENSITY`] to full intensity.
    FadeOut,
    /// Terminal: the run is finalizing.
    Complete,
}

/// Segment durations of one run, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before anything becomes visible.
    #[serde(alias = "initialDelay")]
    pub initial_delay: f64,
    /// Length of the eased ramp-in.
    #[serde(alias = "fadeInDuration")]
    pub fade_in: f64,
    /// Length of the plateau.
    #[serde(alias = "holdDuration")]
    pub hold: f64,
    /// Length of the final dissolve. Also normalizes the displacement scale.
    #[serde(alias = "fadeOutDuration")]
    pub fade_out: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_delay: 200.0,
            fade_in: 400.0,
            hold: 200.0,
            fade_out: 1200.0,
        }
    }
}

impl TimingConfig {
    /// Build a timing configuration from the four segment lengths.
    pub fn new(initial_delay: f64, fade_in: f64, hold: f64, fade_out: f64) -> Self {
        Self {
            initial_delay,
            fade_in,
            hold,
            fade_out,
        }
    }

    /// Copy with every negative or non-finite field replaced by `0.0`.
    pub fn sanitized(self) -> Self {
        Self {
            initial_delay: non_negative_ms(self.initial_delay),
            fade_in: non_negative_ms(self.fade_in),
            hold: non_negative_ms(self.hold),
            fade_out: non_negative_ms(self.fade_out),
        }
    }

    /// Total run length: the sum of all four segments.
    pub fn total(&self) -> f64 {
        let t = self.sanitized();
        t.initial_delay + t.fade_in + t.hold + t.fade_out
    }

    /// Segments in timeline order, paired with the phase they belong to.
    pub fn segments(&self) -> [(Phase, f64); 4] {
        let t = self.sanitized();
        [
            (Phase::Initial, t.initial_delay),
            (Phase::FadeIn, t.fade_in),
            (Phase::Hold, t.hold),
            (Phase::FadeOut, t.fade_out),
        ]
    }

    /// Cumulative end boundaries `[b0, b1, b2, b3]` of the four segments.
    pub fn boundaries(&self) -> [f64; 4] {
        let mut end = 0.0;
        self.segments().map(|(_, dur)| {
            end += dur;
            end
        })
    }
}

/// Position on the timeline: the current phase and the normalized progress through it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseSample {
    /// Phase containing the sampled instant.
    pub phase: Phase,
    /// Progress through `phase`, in `[0, 1]`.
    pub progress: f64,
}

impl PhaseSample {
    /// Effect intensity at this position.
    pub fn intensity(self) -> f64 {
        intensity(self.phase, self.progress)
    }
}

/// Map elapsed milliseconds onto the run timeline.
///
/// Segments are half-open `[start, end)`, so a zero-length segment is empty and the instant falls
/// through to the next non-empty one on the same evaluation.
pub fn classify(elapsed: f64, timing: &TimingConfig) -> PhaseSample {
    let elapsed = if elapsed.is_nan() { 0.0 } else { elapsed.max(0.0) };

    let mut start = 0.0;
    for (phase, dur) in timing.segments() {
        let end = start + dur;
        if elapsed < end {
            // `dur > 0` here: an empty segment cannot contain `elapsed >= start`.
            let progress = ((elapsed - start) / dur).clamp(0.0, 1.0);
            return PhaseSample { phase, progress };
        }
        start = end;
    }

    PhaseSample {
        phase: Phase::Complete,
        progress: 1.0,
    }
}

/// Normalized effect intensity for a phase and progress.
///
/// Fade-in and hold never exceed [`HOLD_INTENSITY`]; only fade-out reaches full strength.
pub fn intensity(phase: Phase, progress: f64) -> f64 {
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    match phase {
        Phase::Initial | Phase::Complete => 0.0,
        Phase::FadeIn => ease_in_cubic(p) * HOLD_INTENSITY,
        Phase::Hold => HOLD_INTENSITY,
        Phase::FadeOut => HOLD_INTENSITY + p * FADE_OUT_SPAN,
    }
}

/// [`classify`] bound to one sanitized [`TimingConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseClock {
    timing: TimingConfig,
}

impl PhaseClock {
    /// Bind a clock to `timing`. Invalid fields are defaulted to `0.0`.
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing: timing.sanitized(),
        }
    }

    /// The sanitized timing this clock evaluates against.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Classify `elapsed` milliseconds.
    pub fn sample(&self, elapsed: f64) -> PhaseSample {
        classify(elapsed, &self.timing)
    }

    /// Displacement scale for an intensity: normalized by the fade-out length in every phase.
    pub fn scale_for(&self, intensity: f64) -> f64 {
        intensity * self.timing.fade_out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/phase.rs"]
mod tests;
