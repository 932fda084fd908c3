//! Two-phase snapshot restore
//!
//! Restoring a snapshot onto a surface is split in two so that decoding
//! never runs on the input path:
//!
//! 1. the surface hands out a [`RestoreTicket`] (`RasterSurface::import_snapshot`
//!    or `RasterSurface::resize`),
//! 2. [`RestoreTicket::decode`] runs wherever convenient (it is `Send`),
//! 3. the [`DecodedRestore`] is handed back to `RasterSurface::complete_restore`.
//!
//! Each ticket carries a [`RestoreToken`]. A surface only accepts the
//! token it issued last; clearing, resizing or importing again
//! supersedes earlier tickets, so at most one decode ever lands.

use image::RgbaImage;

use crate::snapshot::{Snapshot, SnapshotError};

/// Identifies one restore operation on one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RestoreToken(pub(crate) u64);

impl RestoreToken {
    #[inline]
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A restore that has been requested but not decoded yet
#[derive(Debug, Clone)]
#[must_use = "a restore ticket does nothing until decoded and completed"]
pub struct RestoreTicket {
    pub(crate) token: RestoreToken,
    pub(crate) snapshot: Snapshot,
}

impl RestoreTicket {
    #[inline]
    pub fn token(&self) -> RestoreToken {
        self.token
    }

    #[inline]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Decode the snapshot; failures travel with the result
    pub fn decode(self) -> DecodedRestore {
        DecodedRestore {
            token: self.token,
            image: self.snapshot.decode(),
        }
    }
}

/// A decoded restore waiting to be applied
#[derive(Debug)]
pub struct DecodedRestore {
    pub(crate) token: RestoreToken,
    pub(crate) image: Result<RgbaImage, SnapshotError>,
}

impl DecodedRestore {
    #[inline]
    pub fn token(&self) -> RestoreToken {
        self.token
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.image.is_ok()
    }
}

/// What happened when a decoded restore was handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Pixels were composited under the current content
    Applied,
    /// A later clear, resize or import made this restore stale; discarded
    Superseded,
    /// The snapshot could not be decoded; the surface stays cleared
    Failed,
}
