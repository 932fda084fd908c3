//! Surface operations for the painting pipeline

use crate::raster::{PixelRect, TileCoord};
use crate::restore::{DecodedRestore, RestoreOutcome, RestoreTicket};
use crate::snapshot::{Snapshot, SnapshotError};

use super::ChalkPipeline;

impl ChalkPipeline {
    /// Take dirty tiles for repaint
    ///
    /// Returns the tiles modified since the last call and clears the set.
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        self.surface.take_dirty_tiles()
    }

    pub fn has_dirty_tiles(&self) -> bool {
        self.surface.has_dirty_tiles()
    }

    pub fn get_tile_data(&self, coord: TileCoord) -> Vec<[f32; 4]> {
        self.surface.get_tile_data(coord)
    }

    pub fn get_tile_bounds(&self, coord: TileCoord) -> PixelRect {
        self.surface.get_tile_bounds(coord)
    }

    pub fn tile_size(&self) -> u32 {
        self.surface.tile_size()
    }

    /// Pixels of a region in row-major order, clamped to the surface
    pub fn get_region_data(&self, region: PixelRect) -> Vec<[f32; 4]> {
        self.surface.get_region_data(region)
    }

    pub fn compute_tiles_bounding_box(&self, tiles: &[TileCoord]) -> Option<PixelRect> {
        self.surface.compute_tiles_bounding_box(tiles)
    }

    /// Clear to transparent, cancelling any in-flight restore
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Follow a container resize
    ///
    /// See [`RasterSurface::resize`](crate::raster::RasterSurface::resize).
    pub fn resize(&mut self, width: f64, height: f64) -> Option<RestoreTicket> {
        self.surface.resize(width, height)
    }

    pub fn export_snapshot(&self) -> Result<Snapshot, SnapshotError> {
        self.surface.export_snapshot()
    }

    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> RestoreTicket {
        self.surface.import_snapshot(snapshot)
    }

    pub fn complete_restore(&mut self, decoded: DecodedRestore) -> RestoreOutcome {
        self.surface.complete_restore(decoded)
    }

    pub fn flush_pending_restore(&mut self) -> Option<RestoreOutcome> {
        self.surface.flush_pending_restore()
    }

    pub fn has_pending_restore(&self) -> bool {
        self.surface.has_pending_restore()
    }

    /// Raw surface data as bytes (for full texture upload)
    pub fn surface_as_bytes(&self) -> &[u8] {
        self.surface.surface().as_bytes()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.surface.surface().get_pixel(x, y)
    }
}
