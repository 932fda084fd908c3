use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHALK_SIZE, DEFAULT_PRESSURE};

/// Fixed chalk palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChalkColor {
    #[default]
    White,
    Red,
    Yellow,
    Blue,
    Green,
}

impl ChalkColor {
    /// Palette order as shown in the toolbar
    pub const ALL: [ChalkColor; 5] = [
        ChalkColor::White,
        ChalkColor::Red,
        ChalkColor::Yellow,
        ChalkColor::Blue,
        ChalkColor::Green,
    ];

    /// CSS hex string
    pub fn hex(self) -> &'static str {
        match self {
            ChalkColor::White => "#F4F4F5",
            ChalkColor::Red => "#FCA5A5",
            ChalkColor::Yellow => "#FDE047",
            ChalkColor::Blue => "#93C5FD",
            ChalkColor::Green => "#86EFAC",
        }
    }

    /// 8-bit sRGB components
    pub fn rgb8(self) -> [u8; 3] {
        match self {
            ChalkColor::White => [0xF4, 0xF4, 0xF5],
            ChalkColor::Red => [0xFC, 0xA5, 0xA5],
            ChalkColor::Yellow => [0xFD, 0xE0, 0x47],
            ChalkColor::Blue => [0x93, 0xC5, 0xFD],
            ChalkColor::Green => [0x86, 0xEF, 0xAC],
        }
    }

    /// Opaque color as straight-alpha RGBA in 0.0-1.0
    pub fn to_rgba(self) -> [f32; 4] {
        let [r, g, b] = self.rgb8();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}

/// Compositing operator for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BlendMode {
    /// Paint on top of existing content
    #[default]
    SourceOver = 0,
    /// Remove existing content, color is ignored
    DestinationOut = 1,
    /// Paint underneath existing content (used by snapshot restore)
    DestinationOver = 2,
}

/// Process-wide drawing tool selection
///
/// Exactly one of drawing-with-color or erasing is active: selecting a
/// color leaves eraser mode, selecting the eraser keeps the last color
/// for when chalk is picked up again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolState {
    color: ChalkColor,
    size: f32,
    is_eraser: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            color: ChalkColor::White,
            size: DEFAULT_CHALK_SIZE,
            is_eraser: false,
        }
    }
}

impl ToolState {
    /// Create a chalk tool with the given color and base size
    ///
    /// Non-positive or non-finite sizes fall back to the default size.
    pub fn chalk(color: ChalkColor, size: f32) -> Self {
        let mut tool = Self {
            color,
            ..Self::default()
        };
        tool.set_size(size);
        tool
    }

    #[inline]
    pub fn color(&self) -> ChalkColor {
        self.color
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn is_eraser(&self) -> bool {
        self.is_eraser
    }

    /// Pick up chalk of the given color (leaves eraser mode)
    pub fn select_color(&mut self, color: ChalkColor) {
        self.color = color;
        self.is_eraser = false;
    }

    /// Switch to the eraser
    pub fn select_eraser(&mut self) {
        self.is_eraser = true;
    }

    /// Set the base stroke width
    ///
    /// Returns false (and keeps the old size) for non-positive or non-finite values.
    pub fn set_size(&mut self, size: f32) -> bool {
        if size.is_finite() && size > 0.0 {
            self.size = size;
            true
        } else {
            false
        }
    }

    /// Compositing operator used for strokes drawn with this tool
    pub fn blend_mode(&self) -> BlendMode {
        if self.is_eraser {
            BlendMode::DestinationOut
        } else {
            BlendMode::SourceOver
        }
    }
}

/// A single raw pointer sample in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    /// Normalized 0.0-1.0; anything else is normalized before use
    pub pressure: f32,
    pub timestamp_ms: u64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, pressure: f32, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            pressure,
            timestamp_ms,
        }
    }

    /// Sample from a device that does not report pressure
    pub fn without_pressure(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(x, y, DEFAULT_PRESSURE, timestamp_ms)
    }

    /// Euclidean distance to another position
    #[inline]
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether both coordinates are usable
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_hex_matches_rgb() {
        for color in ChalkColor::ALL {
            let [r, g, b] = color.rgb8();
            assert_eq!(color.hex(), format!("#{:02X}{:02X}{:02X}", r, g, b));
        }
    }

    #[test]
    fn test_tool_state_exclusive_modes() {
        let mut tool = ToolState::default();
        assert!(!tool.is_eraser());
        assert_eq!(tool.blend_mode(), BlendMode::SourceOver);

        tool.select_eraser();
        assert!(tool.is_eraser());
        assert_eq!(tool.blend_mode(), BlendMode::DestinationOut);

        tool.select_color(ChalkColor::Red);
        assert!(!tool.is_eraser());
        assert_eq!(tool.color(), ChalkColor::Red);
    }

    #[test]
    fn test_tool_state_rejects_bad_size() {
        let mut tool = ToolState::default();
        assert!(!tool.set_size(0.0));
        assert!(!tool.set_size(-3.0));
        assert!(!tool.set_size(f32::NAN));
        assert_eq!(tool.size(), DEFAULT_CHALK_SIZE);
        assert!(tool.set_size(8.0));
        assert_eq!(tool.size(), 8.0);
    }

    #[test]
    fn test_color_serde_names() {
        let json = serde_json::to_string(&ChalkColor::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
        let back: ChalkColor = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(back, ChalkColor::Blue);
    }
}
