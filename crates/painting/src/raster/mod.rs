//! Raster surface for one board: pixel buffer, dirty tracking and restore state

mod compositing;
mod data_access;
mod dirty_tracking;
mod snapshot_ops;

use crate::constants::DEFAULT_TILE_SIZE;
use crate::restore::RestoreTicket;
use crate::surface::CpuSurface;
use std::collections::HashSet;

pub use compositing::edge_coverage;

/// Tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

/// Axis-aligned pixel rectangle touched by a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The drawable area of one board
///
/// Wraps a [`CpuSurface`] with tile-granular dirty tracking (so a shell
/// knows what to repaint) and the bookkeeping for in-flight snapshot
/// restores.
pub struct RasterSurface {
    pub(crate) surface: CpuSurface,
    pub(crate) tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
    pub(crate) dirty_tiles: HashSet<TileCoord>,
    /// Bumped by every operation that invalidates in-flight restores
    pub(crate) restore_generation: u64,
    /// The only restore whose result will still be applied
    pub(crate) pending_restore: Option<RestoreTicket>,
}

impl RasterSurface {
    /// Create a new raster surface with the given dimensions and tile size
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            surface: CpuSurface::new(width, height),
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
            dirty_tiles: HashSet::new(),
            restore_generation: 0,
            pending_restore: None,
        }
    }

    /// Create a new raster surface with the default tile size
    pub fn with_default_tile_size(width: u32, height: u32) -> Self {
        Self::new(width, height, DEFAULT_TILE_SIZE)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    #[inline]
    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Get the underlying pixel buffer
    #[inline]
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Set every pixel to transparent
    ///
    /// Cancels any restore still in flight so its result cannot
    /// resurrect cleared content.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.cancel_pending_restore();
        self.mark_all_dirty();
    }

    /// Reallocate the buffer, discarding content
    pub(crate) fn reallocate(&mut self, width: u32, height: u32) {
        self.surface.reallocate(width, height);
        self.tiles_x = width.div_ceil(self.tile_size);
        self.tiles_y = height.div_ceil(self.tile_size);
        self.dirty_tiles.clear();
        self.mark_all_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlendMode;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_raster_surface_creation() {
        let surface = RasterSurface::new(256, 256, 128);
        assert_eq!(surface.tiles_x(), 2);
        assert_eq!(surface.tiles_y(), 2);
        assert_eq!(surface.tile_size(), 128);
    }

    #[test]
    fn test_raster_surface_non_aligned() {
        // 300x300 with 128 tile size should give 3x3 tiles
        let surface = RasterSurface::new(300, 300, 128);
        assert_eq!(surface.tiles_x(), 3);
        assert_eq!(surface.tiles_y(), 3);
    }

    fn rect(x: u32, y: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_tile_at() {
        let surface = RasterSurface::new(256, 200, 128);
        assert_eq!(surface.tile_at(130, 10), Some(TileCoord { x: 1, y: 0 }));
        assert_eq!(surface.tile_at(10, 199), Some(TileCoord { x: 0, y: 1 }));
        assert_eq!(surface.tile_at(256, 0), None);
    }

    #[test]
    fn test_mark_rect_dirty_row_major() {
        let mut surface = RasterSurface::new(256, 256, 128);

        // Spans all 4 tiles
        surface.mark_rect_dirty(rect(100, 100, 56, 56));
        assert_eq!(surface.dirty_tile_count(), 4);

        let tiles = surface.take_dirty_tiles();
        let order: Vec<(u32, u32)> = tiles.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert!(!surface.has_dirty_tiles());
    }

    #[test]
    fn test_mark_rect_dirty_clips() {
        let mut surface = RasterSurface::new(256, 256, 128);
        surface.mark_rect_dirty(rect(300, 0, 10, 10));
        surface.mark_rect_dirty(rect(0, 0, 0, 10));
        assert!(!surface.has_dirty_tiles());

        surface.mark_rect_dirty(rect(250, 250, u32::MAX, u32::MAX));
        assert_eq!(surface.dirty_tile_count(), 1);
    }

    #[test]
    fn test_clear_marks_everything_dirty() {
        let mut surface = RasterSurface::new(300, 200, 128);
        surface.apply_dab(10.0, 10.0, 2.0, RED, 1.0, BlendMode::SourceOver);
        surface.take_dirty_tiles();

        surface.clear();
        assert!(surface.surface().is_blank());
        assert_eq!(surface.dirty_tile_count(), 3 * 2);
    }

    #[test]
    fn test_apply_dab_paints_center() {
        let mut surface = RasterSurface::new(256, 256, 128);

        let rect = surface
            .apply_dab(128.5, 128.5, 2.0, RED, 1.0, BlendMode::SourceOver)
            .unwrap();
        assert!(rect.width > 0 && rect.height > 0);

        let center = surface.surface().get_pixel(128, 128).unwrap();
        assert!((center[0] - 1.0).abs() < 0.01);
        assert!((center[3] - 1.0).abs() < 0.01);

        // Far away pixels untouched
        assert_eq!(surface.surface().get_pixel(140, 140), Some([0.0; 4]));
        assert!(surface.has_dirty_tiles());
    }

    #[test]
    fn test_smallest_dab_always_covers_a_pixel() {
        let mut surface = RasterSurface::new(16, 16, 8);
        // Worst case: center on a pixel corner
        surface.apply_dab(8.0, 8.0, 0.5, RED, 1.0, BlendMode::SourceOver);
        assert!(surface.surface().covered_pixel_count() > 0);
    }

    #[test]
    fn test_apply_dab_outside_returns_none() {
        let mut surface = RasterSurface::new(64, 64, 32);
        assert!(surface
            .apply_dab(-50.0, -50.0, 2.0, RED, 1.0, BlendMode::SourceOver)
            .is_none());
        assert!(surface
            .apply_dab(10.0, 10.0, 2.0, RED, 0.0, BlendMode::SourceOver)
            .is_none());
        assert!(!surface.has_dirty_tiles());
    }

    #[test]
    fn test_erase_line_only_touches_path() {
        let mut surface = RasterSurface::new(200, 100, 64);
        surface.surface.fill([1.0, 1.0, 1.0, 1.0]);

        surface.apply_line(20.0, 50.0, 150.0, 50.0, 40.0, RED, 1.0, BlendMode::DestinationOut);

        // On the path: gone
        assert_eq!(surface.surface().get_pixel(100, 50).unwrap()[3], 0.0);
        // Round cap reaches past the endpoint
        assert_eq!(surface.surface().get_pixel(10, 50).unwrap()[3], 0.0);
        // Outside the stroke: untouched
        assert_eq!(surface.surface().get_pixel(100, 5).unwrap()[3], 1.0);
        assert_eq!(surface.surface().get_pixel(100, 95).unwrap()[3], 1.0);
        assert_eq!(surface.surface().get_pixel(199, 50).unwrap()[3], 1.0);
    }

    #[test]
    fn test_edge_coverage() {
        assert_eq!(edge_coverage(0.0, 2.0), 1.0);
        assert_eq!(edge_coverage(2.0, 2.0), 0.5);
        assert_eq!(edge_coverage(3.0, 2.0), 0.0);
    }

    #[test]
    fn test_edge_tile_data() {
        let surface = RasterSurface::new(150, 150, 128);

        // Edge tile is 22x22 pixels
        let tile_data = surface.get_tile_data(TileCoord { x: 1, y: 1 });
        assert_eq!(tile_data.len(), 22 * 22);
    }

    #[test]
    fn test_get_tile_bounds() {
        let surface = RasterSurface::new(150, 150, 128);

        let bounds = surface.get_tile_bounds(TileCoord { x: 0, y: 0 });
        assert_eq!(bounds, PixelRect { x: 0, y: 0, width: 128, height: 128 });

        let bounds = surface.get_tile_bounds(TileCoord { x: 1, y: 1 });
        assert_eq!(bounds, PixelRect { x: 128, y: 128, width: 22, height: 22 });
    }
}
