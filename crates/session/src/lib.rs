//! Board session manager
//!
//! A [`BoardSession`] owns the ordered list of boards, the id of the
//! active one, the tool state shared by all boards and the single live
//! [`ChalkPipeline`](painting::ChalkPipeline). Inactive boards exist only
//! as their last snapshot; switching boards stores the outgoing surface
//! and restores the incoming one through a two-phase restore ticket.

mod analysis;
mod board;
mod dispatch;
mod session;

pub use board::Board;
pub use dispatch::CommandOutcome;
pub use session::BoardSession;

use chalkboard_ipc::BoardId;
use painting::SnapshotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Board limit of {max} reached")]
    CapacityReached { max: usize },

    #[error("Unknown board {0}")]
    UnknownBoard(BoardId),

    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    #[error("Snapshot failed: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl SessionError {
    /// Stable identifier for shell error events
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::CapacityReached { .. } => "capacity_reached",
            SessionError::UnknownBoard(_) => "unknown_board",
            SessionError::AnalysisInProgress => "analysis_in_progress",
            SessionError::Snapshot(_) => "snapshot_failed",
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> chalkboard_config::ChalkboardConfig {
    let mut config = chalkboard_config::ChalkboardConfig::default();
    config.display.width = 120;
    config.display.height = 80;
    config.render.seed = Some(1234);
    config
}
