//! Which tiles a shell has to repaint

use tracing::trace;

use super::{PixelRect, RasterSurface, TileCoord};

impl RasterSurface {
    /// Tile containing a pixel, or None outside the surface
    pub fn tile_at(&self, x: u32, y: u32) -> Option<TileCoord> {
        (x < self.width() && y < self.height()).then(|| TileCoord {
            x: x / self.tile_size,
            y: y / self.tile_size,
        })
    }

    /// Flag the tiles overlapping `rect`, clipped to the surface
    pub fn mark_rect_dirty(&mut self, rect: PixelRect) {
        let right = rect.x.saturating_add(rect.width).min(self.width());
        let bottom = rect.y.saturating_add(rect.height).min(self.height());
        if rect.x >= right || rect.y >= bottom {
            return;
        }

        let first = TileCoord {
            x: rect.x / self.tile_size,
            y: rect.y / self.tile_size,
        };
        let last = TileCoord {
            x: (right - 1) / self.tile_size,
            y: (bottom - 1) / self.tile_size,
        };
        for y in first.y..=last.y {
            self.dirty_tiles
                .extend((first.x..=last.x).map(|x| TileCoord { x, y }));
        }
        trace!(
            "mark_rect_dirty: tiles ({}, {})..=({}, {}), {} pending",
            first.x,
            first.y,
            last.x,
            last.y,
            self.dirty_tiles.len()
        );
    }

    /// Flag every tile (after clear or reallocation)
    pub fn mark_all_dirty(&mut self) {
        self.mark_rect_dirty(PixelRect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        });
    }

    /// Drain the dirty set in row-major order
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        let mut tiles: Vec<TileCoord> = self.dirty_tiles.drain().collect();
        tiles.sort_unstable_by_key(|tile| (tile.y, tile.x));
        tiles
    }

    #[inline]
    pub fn has_dirty_tiles(&self) -> bool {
        !self.dirty_tiles.is_empty()
    }

    #[inline]
    pub fn dirty_tile_count(&self) -> usize {
        self.dirty_tiles.len()
    }
}
