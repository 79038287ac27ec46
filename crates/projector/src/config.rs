use serde::{Deserialize, Serialize};

/// Runtime limits for a projector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectorConfig {
    /// Upper bound on the number of outputs a single projection may produce.
    /// `None` leaves expansion unbounded.
    pub max_outputs: Option<usize>,
}

impl ProjectorConfig {
    pub fn with_max_outputs(mut self, limit: usize) -> Self {
        self.max_outputs = Some(limit);
        self
    }

    /// Checks an expansion against the limit, returning the limit that would be exceeded.
    pub(crate) fn exceeded_by(&self, requested: usize) -> Option<usize> {
        self.max_outputs.filter(|limit| requested > *limit)
    }
}
