//! Encoded surface snapshots
//!
//! A [`Snapshot`] is an immutable PNG copy of a surface. It is what a
//! board keeps while inactive, what a resize carries across the
//! reallocation, and what is sent for analysis. Cloning shares the
//! encoded bytes, so "the same snapshot" can be checked by reference.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::surface::CpuSurface;

/// Header of a PNG data URL
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

const DATA_URL_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Opaque PNG-encoded copy of a surface
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Arc<[u8]>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    /// Snapshot of a zero-area surface
    pub fn empty() -> Self {
        Self {
            png: Arc::from(Vec::new()),
        }
    }

    /// Encode the full buffer as PNG
    pub fn encode(surface: &CpuSurface) -> Result<Self, SnapshotError> {
        if surface.is_degenerate() {
            return Ok(Self::empty());
        }

        let image = RgbaImage::from_raw(surface.width(), surface.height(), surface.to_rgba8())
            .ok_or_else(|| SnapshotError::Encode("pixel buffer size mismatch".into()))?;

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| SnapshotError::Encode(e.to_string()))?;

        Ok(Self { png: bytes.into() })
    }

    /// Wrap already-encoded image bytes (not validated until decode)
    pub fn from_encoded(bytes: Vec<u8>) -> Self {
        Self { png: bytes.into() }
    }

    /// Decode into 8-bit RGBA
    pub fn decode(&self) -> Result<RgbaImage, SnapshotError> {
        if self.png.is_empty() {
            return Ok(RgbaImage::new(0, 0));
        }
        image::load_from_memory(&self.png)
            .map(|img| img.to_rgba8())
            .map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Parse a `data:image/...;base64,` URL, or a bare base64 payload
    pub fn from_data_url(url: &str) -> Result<Self, SnapshotError> {
        let payload = match url.strip_prefix("data:") {
            Some(rest) => {
                let (mime, payload) = rest
                    .split_once(";base64,")
                    .ok_or_else(|| SnapshotError::DataUrl("missing ;base64, marker".into()))?;
                if !DATA_URL_MIME_TYPES.contains(&mime) {
                    return Err(SnapshotError::DataUrl(format!("unsupported type {mime}")));
                }
                payload
            }
            None => url,
        };
        Ok(Self::from_encoded(STANDARD.decode(payload.trim())?))
    }

    /// Base64 of the PNG bytes, without any header
    pub fn base64_payload(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// `data:image/png;base64,...` form for a web shell
    pub fn to_data_url(&self) -> String {
        format!("{PNG_DATA_URL_PREFIX}{}", self.base64_payload())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.png.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }

    /// True if both handles share the same encoded bytes
    #[inline]
    pub fn ptr_eq(a: &Snapshot, b: &Snapshot) -> bool {
        Arc::ptr_eq(&a.png, &b.png)
    }
}
