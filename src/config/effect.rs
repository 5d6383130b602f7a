use crate::animation::phase::TimingConfig;
use crate::effects::direction::Direction;
use crate::effects::filter::FilterParams;
use crate::foundation::error::{DisintegrateError, DisintegrateResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Run-scoped configuration: everything the caller supplies to start one run.
///
/// Every field defaults, so a partial JSON document (or `{}`) is a valid config.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
    /// Dissolve direction.
    pub direction: Direction,
    /// Segment durations in milliseconds.
    pub timing: TimingConfig,
    /// Noise tuning passed to the filter.
    #[serde(alias = "filterParams")]
    pub filter: FilterParams,
}

impl EffectConfig {
    /// Parse a config from a JSON reader. The result is not yet validated.
    pub fn from_reader<R: std::io::Read>(r: R) -> DisintegrateResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DisintegrateError::serde(format!("parse effect config JSON: {e}")))
    }

    /// Parse a config from a JSON string. The result is not yet validated.
    pub fn from_json_str(s: &str) -> DisintegrateResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| DisintegrateError::serde(format!("parse effect config JSON: {e}")))
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DisintegrateResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DisintegrateError::validation(format!(
                "open effect config JSON '{}': {e}",
                path.display()
            ))
        })?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DisintegrateResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DisintegrateError::serde(format!("serialize effect config: {e}")))
    }

    /// Reject values the controller would otherwise have to default.
    pub fn validate(&self) -> DisintegrateResult<()> {
        let t = &self.timing;
        for (name, v) in [
            ("timing.initial_delay", t.initial_delay),
            ("timing.fade_in", t.fade_in),
            ("timing.hold", t.hold),
            ("timing.fade_out", t.fade_out),
        ] {
            if !v.is_finite() {
                return Err(DisintegrateError::validation(format!(
                    "{name} must be finite"
                )));
            }
            if v < 0.0 {
                return Err(DisintegrateError::validation(format!(
                    "{name} must be >= 0 (got {v})"
                )));
            }
        }

        let f = &self.filter;
        if !f.base_frequency.is_finite() || f.base_frequency < 0.0 {
            return Err(DisintegrateError::validation(
                "filter.base_frequency must be finite and >= 0",
            ));
        }
        if f.num_octaves == 0 {
            return Err(DisintegrateError::validation(
                "filter.num_octaves must be > 0",
            ));
        }
        if !f.slope.is_finite() || !f.intercept.is_finite() {
            return Err(DisintegrateError::validation(
                "filter.slope and filter.intercept must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/effect.rs"]
mod tests;
