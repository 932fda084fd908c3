//! Tile data access and region queries for shell repaint

use super::{PixelRect, RasterSurface, TileCoord};

impl RasterSurface {
    /// Pixel bounds of a tile (edge tiles may be smaller than `tile_size`)
    pub fn get_tile_bounds(&self, coord: TileCoord) -> PixelRect {
        let x = coord.x * self.tile_size;
        let y = coord.y * self.tile_size;

        PixelRect {
            x,
            y,
            width: self.tile_size.min(self.surface.width().saturating_sub(x)),
            height: self.tile_size.min(self.surface.height().saturating_sub(y)),
        }
    }

    /// Pixel data of one tile in row-major order
    pub fn get_tile_data(&self, coord: TileCoord) -> Vec<[f32; 4]> {
        let bounds = self.get_tile_bounds(coord);
        self.get_region_data(bounds)
    }

    /// Pixel data for a rectangular region, clamped to surface bounds
    pub fn get_region_data(&self, region: PixelRect) -> Vec<[f32; 4]> {
        let x_end = region.x.saturating_add(region.width).min(self.surface.width());
        let y_end = region.y.saturating_add(region.height).min(self.surface.height());
        if region.x >= x_end || region.y >= y_end {
            return Vec::new();
        }

        let row_len = self.surface.width() as usize;
        let pixels = self.surface.pixels();
        let mut data = Vec::with_capacity(((x_end - region.x) * (y_end - region.y)) as usize);

        for row in region.y..y_end {
            let start = row as usize * row_len;
            data.extend_from_slice(&pixels[start + region.x as usize..start + x_end as usize]);
        }

        data
    }

    /// Bounding box of the given tiles; None if no tiles provided
    pub fn compute_tiles_bounding_box(&self, tiles: &[TileCoord]) -> Option<PixelRect> {
        let mut bounds = tiles.iter().map(|tile| self.get_tile_bounds(*tile));
        let first = bounds.next()?;

        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
        for b in bounds {
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.x + b.width);
            max_y = max_y.max(b.y + b.height);
        }

        (max_x > min_x && max_y > min_y).then(|| PixelRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}
