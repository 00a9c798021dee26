use serde::{Deserialize, Serialize};

/// Knobs for a single interpreter run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Upper bound on iterations of any one `while`, `for` or `foreach`
    /// execution. `None` leaves loops unbounded.
    pub max_iterations: Option<usize>,
    /// Whether `a[i] = v` and `m.k = v` mutate the container. When disabled
    /// such writes are accepted and ignored.
    pub indexed_assignment: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            max_iterations: None,
            indexed_assignment: true,
        }
    }
}

impl ExecutionConfig {
    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn with_indexed_assignment(mut self, enabled: bool) -> Self {
        self.indexed_assignment = enabled;
        self
    }
}
