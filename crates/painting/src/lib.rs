//! Chalkboard painting system - raster surfaces and chalk strokes
//!
//! This crate provides the drawing core of the chalkboard:
//! - [`surface`] - CPU RGBA pixel buffer with source-over / destination-out compositing
//! - [`raster`] - Raster surface with dirty tracking, resize and snapshot restore
//! - [`snapshot`] - PNG-encoded, cheaply clonable copies of a surface
//! - [`restore`] - Two-phase (decode, then apply) snapshot restore tickets
//! - [`brush`] - Stochastic chalk texture and eraser stroke renderer
//! - [`rng`] - Injectable random source for reproducible chalk texture
//! - [`haptics`] - Haptic feedback collaborator
//! - [`pipeline`] - Pointer input state machine driving the renderer

pub mod brush;
pub mod constants;
pub mod haptics;
pub mod pipeline;
pub mod raster;
pub mod restore;
pub mod rng;
pub mod snapshot;
pub mod surface;
pub mod types;
pub mod validation;

pub use brush::*;
pub use constants::*;
pub use haptics::*;
pub use pipeline::*;
pub use raster::*;
pub use restore::*;
pub use rng::*;
pub use snapshot::*;
pub use surface::*;
pub use types::*;
pub use validation::*;
