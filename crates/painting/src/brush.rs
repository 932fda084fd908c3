//! Stroke renderer: turns one pointer segment into chalk texture or an erase
//!
//! Chalk is drawn as a trail of small, randomly scattered discs ("dabs")
//! roughly one per unit of travel. Each dab gets its own random offset,
//! opacity and radius, which gives the grainy look. The eraser is a plain
//! round-capped destination-out line and involves no randomness.

use tracing::debug;

use crate::constants::{DAB_RADIUS_SPAN, DEFAULT_MAX_DABS_PER_SEGMENT, MIN_DAB_RADIUS};
use crate::raster::RasterSurface;
use crate::rng::{DabRng, SplitMix64};
use crate::surface::TRANSPARENT;
use crate::types::{BlendMode, ToolState};
use crate::validation::{chalk_opacity_ceiling, chalk_size, eraser_width, normalize_pressure};

/// One disc of chalk texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChalkDab {
    /// X position in surface coordinates
    pub x: f32,
    /// Y position in surface coordinates
    pub y: f32,
    /// Disc radius in pixels
    pub radius: f32,
    /// Opacity 0.0-1.0
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Chalk,
    Eraser,
}

/// What rendering a segment did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStats {
    pub mode: StrokeMode,
    /// Dabs emitted (1 for an eraser line, 0 if the segment was skipped)
    pub dabs: usize,
    /// Segment length
    pub distance: f32,
    /// True if the dab count hit the per-segment cap
    pub capped: bool,
}

/// Renders pointer segments onto a [`RasterSurface`]
pub struct StrokeRenderer {
    rng: Box<dyn DabRng + Send>,
    max_dabs_per_segment: usize,
}

impl StrokeRenderer {
    pub fn new(rng: impl DabRng + Send + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            max_dabs_per_segment: DEFAULT_MAX_DABS_PER_SEGMENT,
        }
    }

    /// Reproducible renderer
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SplitMix64::new(seed))
    }

    /// Renderer seeded from the clock
    pub fn from_time() -> Self {
        Self::new(SplitMix64::from_time())
    }

    /// Limit the dabs one segment may emit (at least 1)
    pub fn with_max_dabs(mut self, max_dabs_per_segment: usize) -> Self {
        self.max_dabs_per_segment = max_dabs_per_segment.max(1);
        self
    }

    #[inline]
    pub fn max_dabs_per_segment(&self) -> usize {
        self.max_dabs_per_segment
    }

    /// Generate the chalk dabs for the segment (x0, y0) -> (x1, y1)
    ///
    /// One dab per unit of length (at least one for a zero-length
    /// segment). Each dab is scattered by up to half the pressure-scaled
    /// size on both axes. When the cap is hit the capped number of dabs
    /// is spread evenly over the whole segment.
    pub fn chalk_dabs(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        base_size: f32,
        pressure: f32,
    ) -> Vec<ChalkDab> {
        let pressure = normalize_pressure(pressure);
        let size = chalk_size(base_size, pressure);
        let opacity_ceiling = chalk_opacity_ceiling(pressure);

        let dx = x1 - x0;
        let dy = y1 - y0;
        let distance = (dx * dx + dy * dy).sqrt();

        let natural_steps = if distance > 0.0 {
            distance.ceil() as usize
        } else {
            1
        };
        let steps = natural_steps.min(self.max_dabs_per_segment);
        let capped = steps < natural_steps;

        let mut dabs = Vec::with_capacity(steps);
        for i in 0..steps {
            let t = if distance <= 0.0 {
                0.0
            } else if capped {
                i as f32 / steps as f32
            } else {
                i as f32 / distance
            };

            // Draw order matters for reproducibility: x, y, opacity, radius
            let x = x0 + dx * t + self.rng.range(-0.5, 0.5) * size;
            let y = y0 + dy * t + self.rng.range(-0.5, 0.5) * size;
            let opacity = self.rng.next_f32() * opacity_ceiling;
            let radius = self.rng.next_f32() * DAB_RADIUS_SPAN + MIN_DAB_RADIUS;

            dabs.push(ChalkDab {
                x,
                y,
                radius,
                opacity,
            });
        }

        if capped {
            debug!(
                "chalk_dabs: segment of {:.1} capped at {} dabs",
                distance, steps
            );
        }

        dabs
    }

    /// Render one segment with the current tool
    #[allow(clippy::too_many_arguments)]
    pub fn render_segment(
        &mut self,
        surface: &mut RasterSurface,
        tool: &ToolState,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        pressure: f32,
    ) -> SegmentStats {
        let mode = if tool.is_eraser() {
            StrokeMode::Eraser
        } else {
            StrokeMode::Chalk
        };

        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            debug!("render_segment: skipping non-finite segment");
            return SegmentStats {
                mode,
                dabs: 0,
                distance: 0.0,
                capped: false,
            };
        }

        let distance = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();

        match mode {
            StrokeMode::Eraser => {
                surface.apply_line(
                    x0,
                    y0,
                    x1,
                    y1,
                    eraser_width(pressure),
                    TRANSPARENT,
                    1.0,
                    BlendMode::DestinationOut,
                );
                SegmentStats {
                    mode,
                    dabs: 1,
                    distance,
                    capped: false,
                }
            }
            StrokeMode::Chalk => {
                let color = tool.color().to_rgba();
                let dabs = self.chalk_dabs(x0, y0, x1, y1, tool.size(), pressure);
                let capped = dabs.len() < (distance.ceil() as usize).max(1);

                for dab in &dabs {
                    surface.apply_dab(
                        dab.x,
                        dab.y,
                        dab.radius,
                        color,
                        dab.opacity,
                        BlendMode::SourceOver,
                    );
                }

                debug!(
                    "render_segment: {} dabs from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                    dabs.len(),
                    x0,
                    y0,
                    x1,
                    y1
                );

                SegmentStats {
                    mode,
                    dabs: dabs.len(),
                    distance,
                    capped,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChalkColor;

    fn white_tool(size: f32) -> ToolState {
        ToolState::chalk(ChalkColor::White, size)
    }

    #[test]
    fn test_one_dab_per_unit() {
        let mut renderer = StrokeRenderer::with_seed(1);
        let dabs = renderer.chalk_dabs(0.0, 0.0, 100.0, 0.0, 4.0, 1.0);
        assert_eq!(dabs.len(), 100);

        // Partial units round up
        let dabs = renderer.chalk_dabs(0.0, 0.0, 2.5, 0.0, 4.0, 1.0);
        assert_eq!(dabs.len(), 3);
    }

    #[test]
    fn test_zero_length_segment_renders_a_dab() {
        let mut renderer = StrokeRenderer::with_seed(2);
        let dabs = renderer.chalk_dabs(50.0, 50.0, 50.0, 50.0, 4.0, 0.5);
        assert_eq!(dabs.len(), 1);

        let mut surface = RasterSurface::new(100, 100, 32);
        let stats = renderer.render_segment(
            &mut surface,
            &white_tool(4.0),
            50.0,
            50.0,
            50.0,
            50.0,
            0.5,
        );
        assert_eq!(stats.dabs, 1);
        assert!(surface.surface().covered_pixel_count() > 0);
    }

    #[test]
    fn test_dab_bounds_at_full_pressure() {
        let mut renderer = StrokeRenderer::with_seed(3);
        let dabs = renderer.chalk_dabs(0.0, 10.0, 100.0, 10.0, 4.0, 1.0);

        for dab in &dabs {
            assert!((0.5..=2.0).contains(&dab.radius), "radius {}", dab.radius);
            assert!((0.0..=1.0).contains(&dab.opacity), "opacity {}", dab.opacity);
            // Scatter is at most half the size (4.0) on each axis
            assert!((dab.y - 10.0).abs() <= 2.0);
            assert!(dab.x >= -2.0 && dab.x <= 102.0);
        }
    }

    #[test]
    fn test_low_pressure_limits_scatter_and_opacity() {
        let mut renderer = StrokeRenderer::with_seed(4);
        let dabs = renderer.chalk_dabs(0.0, 0.0, 0.0, 200.0, 8.0, 0.0);

        for dab in &dabs {
            assert!(dab.x.abs() <= 2.0);
            assert!(dab.opacity <= 0.5);
        }
    }

    #[test]
    fn test_texture_statistics() {
        let mut renderer = StrokeRenderer::with_seed(5);
        let dabs = renderer.chalk_dabs(0.0, 0.0, 4000.0, 0.0, 4.0, 1.0);

        let mean_opacity = dabs.iter().map(|d| d.opacity).sum::<f32>() / dabs.len() as f32;
        let mean_radius = dabs.iter().map(|d| d.radius).sum::<f32>() / dabs.len() as f32;
        assert!((mean_opacity - 0.5).abs() < 0.05);
        assert!((mean_radius - 1.25).abs() < 0.05);
    }

    #[test]
    fn test_invalid_pressure_uses_default() {
        let mut a = StrokeRenderer::with_seed(6);
        let mut b = StrokeRenderer::with_seed(6);
        let nan = a.chalk_dabs(0.0, 0.0, 30.0, 0.0, 4.0, f32::NAN);
        let half = b.chalk_dabs(0.0, 0.0, 30.0, 0.0, 4.0, 0.5);
        assert_eq!(nan, half);
    }

    #[test]
    fn test_seeded_renderers_match() {
        let mut a = StrokeRenderer::with_seed(99);
        let mut b = StrokeRenderer::with_seed(99);
        let mut surface_a = RasterSurface::new(64, 64, 32);
        let mut surface_b = RasterSurface::new(64, 64, 32);
        let tool = white_tool(4.0);

        a.render_segment(&mut surface_a, &tool, 5.0, 5.0, 60.0, 40.0, 0.7);
        b.render_segment(&mut surface_b, &tool, 5.0, 5.0, 60.0, 40.0, 0.7);
        assert_eq!(surface_a.surface().pixels(), surface_b.surface().pixels());
    }

    #[test]
    fn test_cap_spreads_dabs_over_segment() {
        let mut renderer = StrokeRenderer::with_seed(7).with_max_dabs(10);
        let dabs = renderer.chalk_dabs(0.0, 0.0, 1000.0, 0.0, 4.0, 1.0);
        assert_eq!(dabs.len(), 10);
        assert!(dabs[0].x.abs() <= 2.0);
        assert!((dabs[9].x - 900.0).abs() <= 2.0);

        let mut surface = RasterSurface::new(16, 16, 16);
        let stats = renderer.render_segment(
            &mut surface,
            &white_tool(4.0),
            0.0,
            0.0,
            1000.0,
            0.0,
            1.0,
        );
        assert!(stats.capped);
        assert_eq!(stats.dabs, 10);
    }

    #[test]
    fn test_eraser_removes_only_along_path() {
        let mut surface = RasterSurface::new(200, 120, 64);
        let mut renderer = StrokeRenderer::with_seed(8);
        let chalk = white_tool(8.0);
        for y in (10..120).step_by(10) {
            let y = y as f32;
            renderer.render_segment(&mut surface, &chalk, 0.0, y, 200.0, y, 1.0);
        }
        let before: Vec<[f32; 4]> = surface.surface().pixels().to_vec();

        let mut eraser = chalk;
        eraser.select_eraser();
        let stats = renderer.render_segment(&mut surface, &eraser, 50.0, 60.0, 150.0, 60.0, 0.0);
        assert_eq!(stats.mode, StrokeMode::Eraser);

        // Width 40 at zero pressure: everything within 20 of the path is gone
        for y in 41..79 {
            for x in 50..150 {
                assert_eq!(surface.surface().get_pixel(x, y).unwrap()[3], 0.0);
            }
        }
        // Far from the path nothing changed
        let width = surface.width() as usize;
        for y in [0usize, 30, 90, 119] {
            for x in 0..200usize {
                assert_eq!(surface.surface().pixels()[y * width + x], before[y * width + x]);
            }
        }
        for y in 0..120usize {
            for x in [0usize, 20, 175, 199] {
                assert_eq!(surface.surface().pixels()[y * width + x], before[y * width + x]);
            }
        }
    }

    #[test]
    fn test_non_finite_segment_skipped() {
        let mut renderer = StrokeRenderer::with_seed(9);
        let mut surface = RasterSurface::new(32, 32, 32);
        let stats = renderer.render_segment(
            &mut surface,
            &white_tool(4.0),
            f32::NAN,
            0.0,
            10.0,
            10.0,
            0.5,
        );
        assert_eq!(stats.dabs, 0);
        assert!(surface.surface().is_blank());
    }
}
