/// Largest width or height a surface may be resized to.
pub const MAX_SURFACE_DIMENSION: u32 = 16384;

/// Default tile size for dirty tracking.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Pressure used when the device reports a negative or non-finite value.
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Eraser line width at zero pressure.
pub const ERASER_BASE_WIDTH: f32 = 40.0;

/// Extra eraser width at full pressure.
pub const ERASER_PRESSURE_WIDTH: f32 = 20.0;

/// Smallest chalk dab radius.
pub const MIN_DAB_RADIUS: f32 = 0.5;

/// Random span added on top of [`MIN_DAB_RADIUS`].
pub const DAB_RADIUS_SPAN: f32 = 1.5;

/// Cap on dabs emitted for a single segment.
pub const DEFAULT_MAX_DABS_PER_SEGMENT: usize = 4096;

/// Pointer travel between two grain pulses.
pub const GRAIN_DISTANCE: f32 = 8.0;

/// Pulse length when a stroke starts (ms).
pub const STROKE_START_PULSE_MS: u64 = 10;

/// Pulse length for each grain tick (ms).
pub const GRAIN_PULSE_MS: u64 = 5;

/// Base stroke width of a fresh tool state.
pub const DEFAULT_CHALK_SIZE: f32 = 4.0;

/// Size presets offered by the toolbar.
pub const SIZE_PRESETS: [f32; 3] = [2.0, 4.0, 8.0];
