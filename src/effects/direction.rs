use crate::foundation::core::Vec2;
use crate::foundation::error::{DisintegrateError, DisintegrateResult};

/// Noise base frequency forced for [`Direction::Random`], regardless of the caller's value.
pub const RANDOM_BASE_FREQUENCY: f64 = 0.05;

/// Which way the element dissolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Both axes, driven by the same scalar, with a denser noise field.
    #[default]
    Random,
    /// Horizontal displacement only.
    Left,
    /// Vertical displacement only.
    Up,
}

/// Color channel of the noise image a displacement axis reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChannelSelector {
    /// Active tag: the axis is displaced.
    R,
    /// Neutral tag.
    G,
}

/// Selectors for the horizontal (`x`) and vertical (`y`) displacement axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChannelPair {
    /// Horizontal axis selector.
    pub x: ChannelSelector,
    /// Vertical axis selector.
    pub y: ChannelSelector,
}

impl ChannelPair {
    /// Derive selectors from axis angles.
    ///
    /// The axes are crossed: `x` is active when the `y` angle is nonzero and vice versa.
    pub fn from_angles(angles: Vec2) -> Self {
        let tag = |component: f64| {
            if component != 0.0 {
                ChannelSelector::R
            } else {
                ChannelSelector::G
            }
        };
        Self {
            x: tag(angles.y),
            y: tag(angles.x),
        }
    }
}

impl Direction {
    /// Axis angles `(x_angle, y_angle)`, or `None` when the direction has no fixed axis.
    pub fn angles(self) -> Option<Vec2> {
        match self {
            Self::Random => None,
            Self::Left => Some(Vec2::new(0.0, 1.0)),
            Self::Up => Some(Vec2::new(1.0, 0.0)),
        }
    }

    /// Channel selectors pushed each frame; `None` for [`Direction::Random`].
    pub fn channels(self) -> Option<ChannelPair> {
        self.angles().map(ChannelPair::from_angles)
    }

    /// Noise base frequency actually sent to the filter.
    pub fn effective_base_frequency(self, requested: f64) -> f64 {
        match self {
            Self::Random => RANDOM_BASE_FREQUENCY,
            Self::Left | Self::Up => requested,
        }
    }

    /// Lowercase name, as accepted by [`str::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Left => "left",
            Self::Up => "up",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = DisintegrateError;

    fn from_str(s: &str) -> DisintegrateResult<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(DisintegrateError::validation("direction must be non-empty"));
        }
        match s.as_str() {
            "random" => Ok(Self::Random),
            "left" => Ok(Self::Left),
            "up" => Ok(Self::Up),
            other => Err(DisintegrateError::validation(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/direction.rs"]
mod tests;
