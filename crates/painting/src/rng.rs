//! Randomness source for chalk texture
//!
//! The renderer never touches a global generator: it draws from a
//! [`DabRng`] it owns, so a seeded generator reproduces a stroke exactly.

use std::time::{SystemTime, UNIX_EPOCH};

/// Uniform random numbers for dab placement
pub trait DabRng {
    /// Uniform in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Uniform in [lo, hi)
    #[inline]
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }
}

impl<R: DabRng + ?Sized> DabRng for Box<R> {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// SplitMix64 generator
///
/// Small state, good enough statistical quality for visual noise and
/// fully determined by its seed.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl DabRng for SplitMix64 {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}
