//! Haptics for a headless run: pulses are logged instead of felt

use std::time::Duration;

use painting::HapticFeedback;
use tracing::trace;

#[derive(Debug, Default)]
pub struct LoggingHaptics {
    pulses: u64,
}

impl HapticFeedback for LoggingHaptics {
    fn pulse(&mut self, duration: Duration) {
        self.pulses += 1;
        trace!("haptic pulse #{} ({} ms)", self.pulses, duration.as_millis());
    }
}
