//! Draw primitives: filled circles (chalk dabs) and round-capped lines (eraser)

use tracing::debug;

use super::{PixelRect, RasterSurface};
use crate::types::BlendMode;

impl RasterSurface {
    /// Composite a filled, anti-aliased circle
    ///
    /// Returns the affected region, or None if nothing could be touched
    /// (zero radius or opacity, or completely outside the surface).
    pub fn apply_dab(
        &mut self,
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: [f32; 4],
        opacity: f32,
        blend_mode: BlendMode,
    ) -> Option<PixelRect> {
        if !(radius > 0.0 && opacity > 0.0) || !center_x.is_finite() || !center_y.is_finite() {
            return None;
        }

        let reach = radius + 0.5;
        let rect = self.clip_rect(
            center_x - reach,
            center_y - reach,
            center_x + reach,
            center_y + reach,
        )?;

        for py in rect.y..rect.y + rect.height {
            for px in rect.x..rect.x + rect.width {
                let dx = (px as f32 + 0.5) - center_x;
                let dy = (py as f32 + 0.5) - center_y;
                let coverage = edge_coverage((dx * dx + dy * dy).sqrt(), radius);
                if coverage > 0.0 {
                    self.composite(px, py, color, opacity * coverage, blend_mode);
                }
            }
        }

        self.mark_rect_dirty(rect);
        Some(rect)
    }

    /// Composite a line of the given width with round caps
    ///
    /// A zero-length line degenerates into a disc of diameter `width`.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_line(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        color: [f32; 4],
        opacity: f32,
        blend_mode: BlendMode,
    ) -> Option<PixelRect> {
        if !(width > 0.0 && opacity > 0.0) || ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }

        let half_width = width / 2.0;
        let reach = half_width + 0.5;
        let rect = self.clip_rect(
            x0.min(x1) - reach,
            y0.min(y1) - reach,
            x0.max(x1) + reach,
            y0.max(y1) + reach,
        )?;

        let seg_x = x1 - x0;
        let seg_y = y1 - y0;
        let seg_len_sq = seg_x * seg_x + seg_y * seg_y;

        for py in rect.y..rect.y + rect.height {
            for px in rect.x..rect.x + rect.width {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                // Closest point on the segment
                let t = if seg_len_sq > 0.0 {
                    (((cx - x0) * seg_x + (cy - y0) * seg_y) / seg_len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = cx - (x0 + seg_x * t);
                let dy = cy - (y0 + seg_y * t);
                let coverage = edge_coverage((dx * dx + dy * dy).sqrt(), half_width);
                if coverage > 0.0 {
                    self.composite(px, py, color, opacity * coverage, blend_mode);
                }
            }
        }

        debug!(
            "apply_line: ({:.1}, {:.1}) -> ({:.1}, {:.1}) width={:.1} mode={:?} region={:?}",
            x0, y0, x1, y1, width, blend_mode, rect
        );
        self.mark_rect_dirty(rect);
        Some(rect)
    }

    #[inline]
    fn composite(&mut self, x: u32, y: u32, color: [f32; 4], amount: f32, blend_mode: BlendMode) {
        match blend_mode {
            BlendMode::SourceOver => self.surface.blend_pixel(x, y, color, amount),
            BlendMode::DestinationOut => self.surface.erase_pixel(x, y, amount),
            BlendMode::DestinationOver => self.surface.blend_pixel_under(x, y, color, amount),
        }
    }

    /// Clamp a float bounding box to the surface; None if empty
    fn clip_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<PixelRect> {
        let width = self.surface.width();
        let height = self.surface.height();

        let x_min = (min_x.floor().max(0.0) as u32).min(width);
        let y_min = (min_y.floor().max(0.0) as u32).min(height);
        let x_max = (max_x.ceil().max(0.0) as u32).min(width);
        let y_max = (max_y.ceil().max(0.0) as u32).min(height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        Some(PixelRect {
            x: x_min,
            y: y_min,
            width: x_max - x_min,
            height: y_max - y_min,
        })
    }
}

/// Fraction of a pixel covered by a shape edge
///
/// `distance` is from the pixel center to the shape's center line, `radius`
/// the shape's half extent. One pixel wide linear ramp centered on the edge.
#[inline]
pub fn edge_coverage(distance: f32, radius: f32) -> f32 {
    (radius + 0.5 - distance).clamp(0.0, 1.0)
}
