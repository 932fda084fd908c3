//! Main IPC message enums for communication between the session and the shell.

use painting::{ChalkColor, ToolState};
use serde::{Deserialize, Serialize};

use crate::IpcError;
use crate::input::PointerInput;
use crate::types::{BoardId, BoardInfo, Language};

/// Messages from the UI shell to the board session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShellCommand {
    /// Pick up chalk of a color (leaves eraser mode)
    SetColor { color: ChalkColor },

    /// Switch to the eraser, keeping the last color
    SelectEraser,

    /// Set the base stroke size
    SetSize { size: f32 },

    /// Clear the active board
    Clear,

    /// Add a board and make it active
    AddBoard,

    /// Switch the active board
    SelectBoard { id: BoardId },

    /// Send the active board to the AI teacher
    Analyze,

    /// Close the analysis result
    DismissAnalysis,

    SetLanguage { language: Language },

    /// Container size changed
    Resize { width: f64, height: f64 },

    /// Store the active board's current content now
    RefreshSnapshot,

    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp,
    PointerLeave,
}

/// Messages from the board session to the UI shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShellEvent {
    /// Initial state sync when the shell loads
    Initialize {
        boards: Vec<BoardInfo>,
        active: BoardId,
        tool: ToolState,
        language: Language,
        size_presets: Vec<f32>,
    },

    /// Board list or active board changed
    BoardsChanged {
        boards: Vec<BoardInfo>,
        active: BoardId,
    },

    ToolChanged { tool: ToolState },

    LanguageChanged { language: Language },

    /// Board limit hit; the shell shows the upgrade prompt
    CapacityReached { max_boards: usize },

    /// The active surface was cleared
    SurfaceCleared { board: BoardId },

    /// A stroke ended and the board's snapshot was stored
    StrokeCompleted { board: BoardId },

    /// Board content is being decoded and will appear shortly
    RestorePending { board: BoardId },

    AnalysisStarted,

    AnalysisFinished { text: String },

    AnalysisDismissed,

    /// Error notification
    Error { code: String, message: String },
}

impl ShellEvent {
    pub fn error(code: impl Into<String>, message: impl ToString) -> Self {
        ShellEvent::Error {
            code: code.into(),
            message: message.to_string(),
        }
    }
}

/// Parse one command
pub fn parse_command(text: &str) -> Result<ShellCommand, IpcError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse a JSON array of commands (a recorded or scripted session)
pub fn parse_script(text: &str) -> Result<Vec<ShellCommand>, IpcError> {
    use serde_json::Value;

    match serde_json::from_str::<Value>(text)? {
        value @ Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Err(IpcError::NotAScript("an object")),
        Value::String(_) => Err(IpcError::NotAScript("a string")),
        Value::Number(_) => Err(IpcError::NotAScript("a number")),
        Value::Bool(_) => Err(IpcError::NotAScript("a boolean")),
        Value::Null => Err(IpcError::NotAScript("null")),
    }
}

/// Serialize an event for the shell
pub fn encode_event(event: &ShellEvent) -> Result<String, IpcError> {
    Ok(serde_json::to_string(event)?)
}
