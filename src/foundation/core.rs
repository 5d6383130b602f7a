use crate::foundation::error::{DisintegrateError, DisintegrateResult};
use std::time::Duration;

pub use kurbo::Vec2;

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> DisintegrateResult<Self> {
        if den == 0 {
            return Err(DisintegrateError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(DisintegrateError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one display refresh in milliseconds.
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Duration of one display refresh, for timer-driven frame sources.
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }

    /// Number of whole frames needed to cover `ms` milliseconds (ceil semantics).
    pub fn frames_to_cover_ms(self, ms: f64) -> u64 {
        if !ms.is_finite() || ms <= 0.0 {
            return 0;
        }
        (ms / self.frame_interval_ms()).ceil() as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Sanitize a caller-supplied duration: non-finite and negative values become `0.0`.
pub(crate) fn non_negative_ms(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
