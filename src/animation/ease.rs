/// Easing curves available to phase intensity mappings.
///
/// Only [`Ease::InCubic`] shapes the current fade-in; the others stay in the vocabulary for
/// future phase curves and for inspection from the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity curve.
    Linear,
    /// `t^3`.
    InCubic,
    /// `1 - (1 - t)^3`.
    OutCubic,
}

impl Ease {
    /// Every easing curve, in declaration order.
    pub const ALL: [Ease; 3] = [Ease::Linear, Ease::InCubic, Ease::OutCubic];

    /// Apply this curve to normalized progress `t`, clamped into `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::InCubic => ease_in_cubic(t),
            Self::OutCubic => ease_out_cubic(t),
        }
    }
}

impl std::str::FromStr for Ease {
    type Err = crate::foundation::error::DisintegrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "linear" => Ok(Self::Linear),
            "in_cubic" | "incubic" => Ok(Self::InCubic),
            "out_cubic" | "outcubic" => Ok(Self::OutCubic),
            other => Err(crate::foundation::error::DisintegrateError::validation(
                format!("unknown ease '{other}'"),
            )),
        }
    }
}

#[inline]
pub(crate) fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

#[inline]
pub(crate) fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
