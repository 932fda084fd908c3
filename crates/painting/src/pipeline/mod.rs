//! Chalk painting pipeline for the active board
//!
//! This module connects:
//! - Pointer input (down / move / up / leave) via a small state machine
//! - The stroke renderer (chalk dabs or eraser lines)
//! - The raster surface (compositing, dirty tiles, snapshots)
//! - Haptic feedback (stroke start and grain pulses)
//!
//! It knows nothing about boards: the session owns one pipeline and
//! swaps board content in and out through snapshots.

mod stroke;
mod surface_ops;

use crate::brush::{SegmentStats, StrokeRenderer};
use crate::haptics::{HapticFeedback, HapticSettings, NoHaptics};
use crate::raster::RasterSurface;

/// Where the pointer is in a stroke
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Drawing {
        last_x: f32,
        last_y: f32,
        last_time_ms: u64,
        /// Travel since the last grain pulse
        grain_accumulator: f32,
    },
}

/// Result of feeding one pointer event to the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Event did not apply in the current state
    Ignored,
    /// A segment was rendered
    Rendered(SegmentStats),
    /// The stroke ended; the caller should store a snapshot
    StrokeCompleted,
}

impl PointerOutcome {
    #[inline]
    pub fn is_stroke_completed(&self) -> bool {
        matches!(self, PointerOutcome::StrokeCompleted)
    }
}

/// Painting pipeline for one live surface
///
/// 1. Pointer events come in via `pointer_down`, `pointer_move`, `pointer_up`
/// 2. The renderer turns each segment into dabs or an eraser line
/// 3. Dabs are composited onto the raster surface
/// 4. Dirty tiles are tracked for the shell to repaint
pub struct ChalkPipeline {
    /// Live pixels of the active board
    pub surface: RasterSurface,
    pub(crate) renderer: StrokeRenderer,
    pub(crate) pointer: PointerState,
    pub(crate) haptics: Box<dyn HapticFeedback>,
    pub(crate) haptic_settings: HapticSettings,
}

impl ChalkPipeline {
    /// Create a pipeline with a clock-seeded renderer and no haptics
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_renderer(width, height, StrokeRenderer::from_time())
    }

    pub fn with_renderer(width: u32, height: u32, renderer: StrokeRenderer) -> Self {
        Self::from_parts(RasterSurface::with_default_tile_size(width, height), renderer)
    }

    pub fn from_parts(surface: RasterSurface, renderer: StrokeRenderer) -> Self {
        Self {
            surface,
            renderer,
            pointer: PointerState::Idle,
            haptics: Box::new(NoHaptics),
            haptic_settings: HapticSettings::default(),
        }
    }

    /// Attach a haptic device
    pub fn with_haptics(
        mut self,
        haptics: impl HapticFeedback + 'static,
        settings: HapticSettings,
    ) -> Self {
        self.haptics = Box::new(haptics);
        self.haptic_settings = settings;
        self
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn haptic_settings(&self) -> &HapticSettings {
        &self.haptic_settings
    }
}
