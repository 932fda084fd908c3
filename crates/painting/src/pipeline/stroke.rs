//! Pointer input state machine
//!
//! `Idle --down--> Drawing --move--> Drawing --up/leave--> Idle`.
//! Events that do not fit the current state are ignored, never errors.

use tracing::debug;

use crate::brush::SegmentStats;
use crate::types::{PointerSample, ToolState};

use super::{ChalkPipeline, PointerOutcome, PointerState};

impl ChalkPipeline {
    /// Start a stroke and render its first dab
    pub fn pointer_down(&mut self, tool: &ToolState, sample: PointerSample) -> PointerOutcome {
        if self.is_drawing() {
            debug!("pointer_down: already drawing, ignoring");
            return PointerOutcome::Ignored;
        }
        if !sample.is_finite() {
            debug!("pointer_down: non-finite position, ignoring");
            return PointerOutcome::Ignored;
        }

        self.pointer = PointerState::Drawing {
            last_x: sample.x,
            last_y: sample.y,
            last_time_ms: sample.timestamp_ms,
            grain_accumulator: 0.0,
        };

        let stats = self.render(tool, sample.x, sample.y, sample);
        if self.haptic_settings.enabled {
            self.haptics.pulse(self.haptic_settings.stroke_start);
        }
        PointerOutcome::Rendered(stats)
    }

    /// Continue the stroke to a new sample
    pub fn pointer_move(&mut self, tool: &ToolState, sample: PointerSample) -> PointerOutcome {
        let PointerState::Drawing {
            last_x,
            last_y,
            grain_accumulator,
            ..
        } = self.pointer
        else {
            return PointerOutcome::Ignored;
        };
        if !sample.is_finite() {
            debug!("pointer_move: non-finite position, ignoring");
            return PointerOutcome::Ignored;
        }

        let stats = self.render(tool, last_x, last_y, sample);

        let mut grain_accumulator = grain_accumulator + sample.distance_to(last_x, last_y);
        if grain_accumulator > self.haptic_settings.grain_distance {
            if self.haptic_settings.enabled {
                self.haptics.pulse(self.haptic_settings.grain);
            }
            grain_accumulator = 0.0;
        }

        self.pointer = PointerState::Drawing {
            last_x: sample.x,
            last_y: sample.y,
            last_time_ms: sample.timestamp_ms,
            grain_accumulator,
        };
        PointerOutcome::Rendered(stats)
    }

    /// End the stroke
    pub fn pointer_up(&mut self) -> PointerOutcome {
        self.end_stroke("pointer_up")
    }

    /// Pointer left the surface; ends the stroke like `pointer_up`
    pub fn pointer_leave(&mut self) -> PointerOutcome {
        self.end_stroke("pointer_leave")
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        matches!(self.pointer, PointerState::Drawing { .. })
    }

    fn end_stroke(&mut self, event: &str) -> PointerOutcome {
        if !self.is_drawing() {
            debug!("{}: no active stroke, ignoring", event);
            return PointerOutcome::Ignored;
        }
        self.pointer = PointerState::Idle;
        PointerOutcome::StrokeCompleted
    }

    fn render(
        &mut self,
        tool: &ToolState,
        from_x: f32,
        from_y: f32,
        to: PointerSample,
    ) -> SegmentStats {
        self.renderer.render_segment(
            &mut self.surface,
            tool,
            from_x,
            from_y,
            to.x,
            to.y,
            to.pressure,
        )
    }
}
