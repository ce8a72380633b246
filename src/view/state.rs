//! View state with deterministic hashing.

use serde::{Deserialize, Serialize};

/// Complete dashboard view state.
///
/// `selected_metric_id` always names a catalog entry for every state reachable
/// through [`super::reducer`]. `revealed` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_metric_id: String,
    pub revealed: bool,
}

impl ViewState {
    pub fn new(selected_metric_id: impl Into<String>) -> Self {
        Self {
            selected_metric_id: selected_metric_id.into(),
            revealed: false,
        }
    }

    /// Compute deterministic state hash
    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut h = DefaultHasher::new();
        self.selected_metric_id.hash(&mut h);
        self.revealed.hash(&mut h);
        h.finish()
    }
}
