//! Typed handle onto the externally owned displacement filter.
//!
//! The renderer owns the actual noise and displacement primitives. The controller only ever
//! writes the handful of numeric parameters below, through [`FilterSink`].

use crate::effects::direction::{ChannelPair, Direction};

/// Caller-supplied noise tuning, passed through to the filter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Noise base frequency. Overridden for [`Direction::Random`].
    #[serde(alias = "baseFrequency")]
    pub base_frequency: f64,
    /// Noise octave count.
    #[serde(alias = "numOctaves")]
    pub num_octaves: u32,
    /// Transfer function slope applied to the noise.
    pub slope: f64,
    /// Transfer function intercept applied to the noise.
    pub intercept: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            base_frequency: 0.015,
            num_octaves: 3,
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl FilterParams {
    /// Noise settings as the filter should receive them for a run in `direction`.
    pub fn noise_for(&self, direction: Direction) -> NoiseSettings {
        NoiseSettings {
            base_frequency: direction.effective_base_frequency(self.base_frequency),
            num_octaves: self.num_octaves,
            slope: self.slope,
            intercept: self.intercept,
        }
    }
}

/// Effective noise configuration written once at the start of a run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NoiseSettings {
    /// Effective base frequency.
    pub base_frequency: f64,
    /// Noise octave count.
    pub num_octaves: u32,
    /// Transfer function slope.
    pub slope: f64,
    /// Transfer function intercept.
    pub intercept: f64,
}

/// Write-only view of the rendering filter.
///
/// Ordering contract: within one run, `configure_noise` and `set_seed` are written before the first
/// `set_scale`, and `set_scale(0.0)` is the last write of a completed run.
pub trait FilterSink {
    /// Apply the run's noise configuration.
    fn configure_noise(&mut self, noise: NoiseSettings);
    /// Set the noise seed, in `[0, 1000)`.
    fn set_seed(&mut self, seed: u32);
    /// Set the displacement scale.
    fn set_scale(&mut self, scale: f64);
    /// Set the horizontal and vertical channel selectors.
    fn set_channels(&mut self, channels: ChannelPair);
}

impl<F: FilterSink + ?Sized> FilterSink for Box<F> {
    fn configure_noise(&mut self, noise: NoiseSettings) {
        (**self).configure_noise(noise);
    }

    fn set_seed(&mut self, seed: u32) {
        (**self).set_seed(seed);
    }

    fn set_scale(&mut self, scale: f64) {
        (**self).set_scale(scale);
    }

    fn set_channels(&mut self, channels: ChannelPair) {
        (**self).set_channels(channels);
    }
}

/// One parameter write, as captured by [`RecordingFilter`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "param", content = "value", rename_all = "snake_case")]
pub enum FilterWrite {
    /// `configure_noise`.
    Noise(NoiseSettings),
    /// `set_seed`.
    Seed(u32),
    /// `set_scale`.
    Scale(f64),
    /// `set_channels`.
    Channels(ChannelPair),
}

/// Current values held by a filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FilterState {
    /// Last noise configuration, if any.
    pub noise: Option<NoiseSettings>,
    /// Last seed, if any.
    pub seed: Option<u32>,
    /// Displacement scale; `0.0` is neutral.
    pub scale: f64,
    /// Last channel selectors, if any.
    pub channels: Option<ChannelPair>,
}

/// Keeps only the latest values, for long-running hosts that need no write log.
impl FilterSink for FilterState {
    fn configure_noise(&mut self, noise: NoiseSettings) {
        self.noise = Some(noise);
    }

    fn set_seed(&mut self, seed: u32) {
        self.seed = Some(seed);
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn set_channels(&mut self, channels: ChannelPair) {
        self.channels = Some(channels);
    }
}

/// In-memory filter for tests, the CLI, and debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingFilter {
    state: FilterState,
    writes: Vec<FilterWrite>,
}

impl RecordingFilter {
    /// Create an empty recording filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current parameter values.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Every write received, in order.
    pub fn writes(&self) -> &[FilterWrite] {
        &self.writes
    }

    /// Drop the write log, keeping current values.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Scale values written so far, in order.
    pub fn scales(&self) -> impl Iterator<Item = f64> + '_ {
        self.writes.iter().filter_map(|w| match w {
            FilterWrite::Scale(s) => Some(*s),
            _ => None,
        })
    }
}

impl FilterSink for RecordingFilter {
    fn configure_noise(&mut self, noise: NoiseSettings) {
        self.state.noise = Some(noise);
        self.writes.push(FilterWrite::Noise(noise));
    }

    fn set_seed(&mut self, seed: u32) {
        self.state.seed = Some(seed);
        self.writes.push(FilterWrite::Seed(seed));
    }

    fn set_scale(&mut self, scale: f64) {
        self.state.scale = scale;
        self.writes.push(FilterWrite::Scale(scale));
    }

    fn set_channels(&mut self, channels: ChannelPair) {
        self.state.channels = Some(channels);
        self.writes.push(FilterWrite::Channels(channels));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
