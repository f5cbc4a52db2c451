//! Pixel-space geometry transform
//!
//! Pure functions mapping tile-local coordinates (in an arbitrary source
//! extent, typically 0..4096) into pixel space at a target tile size,
//! accumulating a bounding box and vertex count for the downstream painter.

mod transform;
mod types;

pub use transform::transform;
pub use types::{GeomKind, PixelBbox, TransformedFeature, TransformedGeometry};
