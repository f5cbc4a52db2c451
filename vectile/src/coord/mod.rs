//! Tile coordinates and the tiling scheme boundary
//!
//! Provides conversions between geographic coordinates (longitude/latitude)
//! and Web Mercator tile coordinates, plus the [`TilingScheme`] trait that
//! the provider layer uses so a host renderer can substitute its own
//! projection math.

mod scheme;
mod types;

pub use scheme::{TilingScheme, WebMercatorTilingScheme};
pub use types::{
    CoordError, Rectangle, TileCoord, MAX_LAT, MAX_LON, MAX_TILE_ZOOM, MIN_LAT, MIN_LON,
};
