//! Board identity and the board list shown as tabs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique, never reused identifier of a board within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tab in the board switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub id: BoardId,
    pub name: String,
    /// Whether the board has stored content to restore
    pub has_snapshot: bool,
}
