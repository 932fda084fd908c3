//! Snapshot export, restore and resize

use tracing::{debug, info, warn};

use super::{PixelRect, RasterSurface};
use crate::restore::{DecodedRestore, RestoreOutcome, RestoreTicket, RestoreToken};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::validation::container_dimension;

impl RasterSurface {
    /// Encode the current pixels as a PNG snapshot
    pub fn export_snapshot(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::encode(&self.surface)
    }

    /// Clear the surface and start restoring `snapshot` onto it
    ///
    /// The surface is blank until the returned ticket is decoded and
    /// handed back to [`complete_restore`](Self::complete_restore).
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> RestoreTicket {
        self.clear();
        self.begin_restore(snapshot)
    }

    /// Reallocate to a new container size, carrying content across
    ///
    /// Non-positive or non-finite dimensions give a zero-area surface.
    /// Returns the ticket that puts the previous content back at the
    /// origin, or None when there is nothing to restore.
    pub fn resize(&mut self, width: f64, height: f64) -> Option<RestoreTicket> {
        let new_width = container_dimension(width);
        let new_height = container_dimension(height);
        if new_width == self.width() && new_height == self.height() {
            return None;
        }

        // Content still waiting for a decode would be lost otherwise
        self.flush_pending_restore();

        let previous = match self.export_snapshot() {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!("resize: dropping content, snapshot failed: {}", err);
                None
            }
        };

        info!(
            "resize: {}x{} -> {}x{}",
            self.width(),
            self.height(),
            new_width,
            new_height
        );
        self.cancel_pending_restore();
        self.reallocate(new_width, new_height);

        if self.surface.is_degenerate() {
            return None;
        }
        previous
            .filter(|snapshot| !snapshot.is_empty())
            .map(|snapshot| self.begin_restore(snapshot))
    }

    /// Apply a decoded restore if it is still the current one
    ///
    /// Restored pixels go underneath anything drawn since the restore
    /// began, clipped to the current size.
    pub fn complete_restore(&mut self, decoded: DecodedRestore) -> RestoreOutcome {
        let is_current = self
            .pending_restore
            .as_ref()
            .is_some_and(|ticket| ticket.token == decoded.token);
        if !is_current {
            debug!(
                "complete_restore: discarding stale generation {}",
                decoded.token.generation()
            );
            return RestoreOutcome::Superseded;
        }
        self.pending_restore = None;

        let image = match decoded.image {
            Ok(image) => image,
            Err(err) => {
                warn!("complete_restore: leaving surface cleared: {}", err);
                return RestoreOutcome::Failed;
            }
        };

        let width = image.width().min(self.width());
        let height = image.height().min(self.height());
        for y in 0..height {
            for x in 0..width {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                if a == 0 {
                    continue;
                }
                let color = [
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ];
                self.surface.blend_pixel_under(x, y, color, 1.0);
            }
        }
        self.mark_rect_dirty(PixelRect {
            x: 0,
            y: 0,
            width,
            height,
        });

        debug!(
            "complete_restore: applied {}x{} (generation {})",
            width,
            height,
            decoded.token.generation()
        );
        RestoreOutcome::Applied
    }

    /// Decode and apply a ticket on the calling thread
    pub fn finish_restore_now(&mut self, ticket: RestoreTicket) -> RestoreOutcome {
        self.complete_restore(ticket.decode())
    }

    /// Apply the outstanding restore, if any, on the calling thread
    ///
    /// Used before reading the surface back when its content must be complete.
    pub fn flush_pending_restore(&mut self) -> Option<RestoreOutcome> {
        let ticket = self.pending_restore.clone()?;
        Some(self.finish_restore_now(ticket))
    }

    #[inline]
    pub fn has_pending_restore(&self) -> bool {
        self.pending_restore.is_some()
    }

    /// Invalidate every ticket handed out so far
    pub(crate) fn cancel_pending_restore(&mut self) {
        self.restore_generation += 1;
        if let Some(ticket) = self.pending_restore.take() {
            debug!(
                "cancel_pending_restore: superseding generation {}",
                ticket.token.generation()
            );
        }
    }

    fn begin_restore(&mut self, snapshot: Snapshot) -> RestoreTicket {
        self.restore_generation += 1;
        let ticket = RestoreTicket {
            token: RestoreToken(self.restore_generation),
            snapshot,
        };
        self.pending_restore = Some(ticket.clone());
        ticket
    }
}
