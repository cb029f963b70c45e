use serde::{Deserialize, Serialize};

/// Outcome of a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Number of records the remote returned (boundary re-deliveries included).
    pub fetched: usize,
    pub cursor_before: i64,
    pub cursor_after: i64,
}

impl RefreshReport {
    /// Returns true if the cursor moved forward.
    pub fn advanced(&self) -> bool {
        self.cursor_after > self.cursor_before
    }
}
