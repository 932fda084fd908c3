//! Board records

use chalkboard_ipc::{BoardId, BoardInfo};
use painting::Snapshot;

/// One canvas in the session
///
/// The live pixels of the active board are in the session's pipeline;
/// `image_data` is the content as of the last stroke completion, refresh
/// or board switch.
#[derive(Debug, Clone)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub image_data: Option<Snapshot>,
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_data: None,
        }
    }

    pub fn info(&self) -> BoardInfo {
        BoardInfo {
            id: self.id,
            name: self.name.clone(),
            has_snapshot: self.image_data.is_some(),
        }
    }
}
