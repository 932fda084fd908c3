//! CPU pixel buffer for a chalkboard - straight-alpha RGBA storage

/// Fully transparent pixel
pub const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// A straight-alpha RGBA CPU surface
/// Stores pixels as [f32; 4] with components in 0.0-1.0
pub struct CpuSurface {
    width: u32,
    height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a]
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; pixel_count],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the surface has zero area
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Reset every pixel to fully transparent
    pub fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    /// Fill the surface with a solid color
    pub fn fill(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Drop the current buffer and allocate a transparent one of the new size
    pub fn reallocate(&mut self, width: u32, height: u32) {
        let pixel_count = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(pixel_count, TRANSPARENT);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over: paint `color` at `opacity` on top of the pixel
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], opacity: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let src_alpha = (color[3] * opacity).clamp(0.0, 1.0);
        if src_alpha <= 0.0 {
            return;
        }
        self.pixels[i] = over(color, src_alpha, self.pixels[i]);
    }

    /// Destination-out: remove `amount` (0-1) of the pixel's coverage
    #[inline]
    pub fn erase_pixel(&mut self, x: u32, y: u32, amount: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let remaining = 1.0 - amount.clamp(0.0, 1.0);
        let dst = self.pixels[i];
        let alpha = dst[3] * remaining;
        self.pixels[i] = if alpha <= 0.0 {
            TRANSPARENT
        } else {
            [dst[0], dst[1], dst[2], alpha]
        };
    }

    /// Destination-over: put `color` at `opacity` underneath the pixel
    #[inline]
    pub fn blend_pixel_under(&mut self, x: u32, y: u32, color: [f32; 4], opacity: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let under_alpha = (color[3] * opacity).clamp(0.0, 1.0);
        if under_alpha <= 0.0 {
            return;
        }
        let top = self.pixels[i];
        self.pixels[i] = over(top, top[3], [color[0], color[1], color[2], under_alpha]);
    }

    /// Number of pixels with any coverage
    pub fn covered_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0.0).count()
    }

    /// True if no pixel has any coverage
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p[3] <= 0.0)
    }

    /// Get raw pixel data for upload by a UI shell
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Quantize to 8-bit RGBA, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            for component in pixel {
                out.push((component.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        out
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

/// Straight-alpha "over" of `src` (with effective alpha `src_alpha`) onto `dst`
#[inline]
fn over(src: [f32; 4], src_alpha: f32, dst: [f32; 4]) -> [f32; 4] {
    let dst_weight = dst[3] * (1.0 - src_alpha);
    let out_alpha = src_alpha + dst_weight;
    if out_alpha <= 0.0 {
        return TRANSPARENT;
    }
    [
        (src[0] * src_alpha + dst[0] * dst_weight) / out_alpha,
        (src[1] * src_alpha + dst[1] * dst_weight) / out_alpha,
        (src[2] * src_alpha + dst[2] * dst_weight) / out_alpha,
        out_alpha,
    ]
}
