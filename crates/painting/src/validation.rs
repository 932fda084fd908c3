//! Normalization of raw input values before they reach the renderer
//!
//! Degenerate input (NaN pressure, negative sizes, non-finite
//! coordinates) is never an error: it is mapped onto a sane value here.

use crate::constants::{
    DEFAULT_PRESSURE, ERASER_BASE_WIDTH, ERASER_PRESSURE_WIDTH, MAX_SURFACE_DIMENSION,
};

/// Normalize device pressure into [0, 1]
///
/// Negative and non-finite values become [`DEFAULT_PRESSURE`], values above 1 are clamped.
#[inline]
pub fn normalize_pressure(pressure: f32) -> f32 {
    if !pressure.is_finite() || pressure < 0.0 {
        DEFAULT_PRESSURE
    } else {
        pressure.min(1.0)
    }
}

/// Chalk spread for a base size and pressure: 50% to 100% of `base_size`
#[inline]
pub fn chalk_size(base_size: f32, pressure: f32) -> f32 {
    base_size * (0.5 + normalize_pressure(pressure) * 0.5)
}

/// Ceiling of the random per-dab opacity for a pressure
#[inline]
pub fn chalk_opacity_ceiling(pressure: f32) -> f32 {
    0.5 + normalize_pressure(pressure) * 0.5
}

/// Eraser line width for a pressure, always within [40, 60]
#[inline]
pub fn eraser_width(pressure: f32) -> f32 {
    ERASER_BASE_WIDTH + normalize_pressure(pressure) * ERASER_PRESSURE_WIDTH
}

/// Convert a requested container dimension into a buffer dimension
///
/// Non-positive values give a degenerate (zero) dimension.
#[inline]
pub fn surface_dimension(requested: i64) -> u32 {
    if requested <= 0 {
        0
    } else {
        requested.min(MAX_SURFACE_DIMENSION as i64) as u32
    }
}

/// Same as [`surface_dimension`] for a floating-point container size
///
/// NaN and infinities give a zero dimension; fractions are truncated.
#[inline]
pub fn container_dimension(requested: f64) -> u32 {
    if requested.is_finite() {
        surface_dimension(requested as i64)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pressure() {
        assert_eq!(normalize_pressure(0.0), 0.0);
        assert_eq!(normalize_pressure(0.75), 0.75);
        assert_eq!(normalize_pressure(1.7), 1.0);
        assert_eq!(normalize_pressure(-0.2), DEFAULT_PRESSURE);
        assert_eq!(normalize_pressure(f32::NAN), DEFAULT_PRESSURE);
        assert_eq!(normalize_pressure(f32::INFINITY), DEFAULT_PRESSURE);
    }

    #[test]
    fn test_chalk_size_envelope() {
        let base = 4.0;
        for i in 0..=100 {
            let pressure = i as f32 / 100.0;
            let size = chalk_size(base, pressure);
            assert!(size >= 0.5 * base - 1e-6 && size <= base + 1e-6);
        }
        assert_eq!(chalk_size(base, 0.0), 2.0);
        assert_eq!(chalk_size(base, 1.0), 4.0);
    }

    #[test]
    fn test_eraser_width_envelope() {
        for i in 0..=100 {
            let width = eraser_width(i as f32 / 100.0);
            assert!((40.0..=60.0).contains(&width));
        }
        assert_eq!(eraser_width(f32::NAN), 50.0);
    }

    #[test]
    fn test_surface_dimension() {
        assert_eq!(surface_dimension(-10), 0);
        assert_eq!(surface_dimension(0), 0);
        assert_eq!(surface_dimension(640), 640);
        assert_eq!(surface_dimension(i64::MAX), MAX_SURFACE_DIMENSION);
    }

    #[test]
    fn test_container_dimension() {
        assert_eq!(container_dimension(800.9), 800);
        assert_eq!(container_dimension(-1.0), 0);
        assert_eq!(container_dimension(f64::NAN), 0);
        assert_eq!(container_dimension(f64::INFINITY), 0);
        assert_eq!(container_dimension(1e12), MAX_SURFACE_DIMENSION);
    }
}
