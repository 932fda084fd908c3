//! Haptic feedback collaborator
//!
//! Pulses are fire-and-forget. Platforms without a vibration motor use
//! [`NoHaptics`]; an implementation must never block or fail.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{GRAIN_DISTANCE, GRAIN_PULSE_MS, STROKE_START_PULSE_MS};

pub trait HapticFeedback: Send {
    fn pulse(&mut self, duration: Duration);
}

/// Does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&mut self, _duration: Duration) {}
}

/// When and how long to pulse during a stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticSettings {
    pub enabled: bool,
    /// Pulse on pointer-down
    pub stroke_start: Duration,
    /// Pulse per `grain_distance` of travel
    pub grain: Duration,
    pub grain_distance: f32,
}

impl Default for HapticSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            stroke_start: Duration::from_millis(STROKE_START_PULSE_MS),
            grain: Duration::from_millis(GRAIN_PULSE_MS),
            grain_distance: GRAIN_DISTANCE,
        }
    }
}
