/// Convenience result type used across the crate.
pub type DisintegrateResult<T> = Result<T, DisintegrateError>;

/// Error taxonomy for the boundary APIs (config loading, frame loop setup).
///
/// The controller itself never returns these: every in-run failure is absorbed locally.
#[derive(thiserror::Error, Debug)]
pub enum DisintegrateError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors while setting up or driving the frame loop.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DisintegrateError {
    /// Build a [`DisintegrateError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DisintegrateError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`DisintegrateError::Scheduler`] value.
    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
