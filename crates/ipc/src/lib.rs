//! IPC message protocol for the chalkboard
//!
//! Defines the messages exchanged between a board session and the UI
//! shell that hosts it: [`ShellCommand`] in, [`ShellEvent`] out, both as
//! tagged JSON (`{"type": ..., "data": ...}`).

mod error;
mod input;
mod messages;
pub mod types;

pub use error::IpcError;
pub use input::PointerInput;
pub use messages::*;
pub use types::*;
