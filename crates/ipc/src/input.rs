//! Pointer input as sent by the shell.

use painting::PointerSample;
use serde::{Deserialize, Serialize};

/// One pointer event in surface-local coordinates.
///
/// Devices without pressure omit it; mice report a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl PointerInput {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            pressure: None,
            timestamp_ms: 0,
        }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

impl From<PointerInput> for PointerSample {
    fn from(input: PointerInput) -> Self {
        match input.pressure {
            Some(pressure) => PointerSample::new(input.x, input.y, pressure, input.timestamp_ms),
            None => PointerSample::without_pressure(input.x, input.y, input.timestamp_ms),
        }
    }
}
