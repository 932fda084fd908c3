//! Type definitions for IPC messages.

mod board;
mod language;

pub use board::*;
pub use language::*;
