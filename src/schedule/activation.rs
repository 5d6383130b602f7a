/// Rising-edge detector for the host's boolean activation signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivationEdge {
    last: bool,
}

impl ActivationEdge {
    /// Create a detector whose previous level is `false`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current level; `true` only on a `false -> true` transition.
    pub fn observe(&mut self, is_active: bool) -> bool {
        let rising = is_active && !self.last;
        self.last = is_active;
        rising
    }

    /// Last observed level.
    pub fn level(&self) -> bool {
        self.last
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/activation.rs"]
mod tests;
