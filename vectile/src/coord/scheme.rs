//! Tiling scheme abstraction.
//!
//! The rest of the pipeline treats the tiling scheme as a black box
//! supplying "tile (x,y,z) → geographic rectangle" and the inverse. The
//! [`WebMercatorTilingScheme`] implementation covers the standard
//! Slippy Map layout; hosts with their own projection math can supply
//! an alternative implementation.

use std::f64::consts::PI;

use super::types::{CoordError, Rectangle, TileCoord, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mapping between geographic positions and tile coordinates.
pub trait TilingScheme: Send + Sync {
    /// The full rectangle covered by the scheme, in degrees.
    fn rectangle(&self) -> Rectangle;

    /// The tile containing (lon, lat) at the given zoom level.
    fn position_to_tile(&self, lon: f64, lat: f64, zoom: u8) -> Result<TileCoord, CoordError>;

    /// The geographic rectangle covered by a tile, in degrees.
    fn tile_rectangle(&self, tile: &TileCoord) -> Rectangle;
}

/// Standard Web Mercator (EPSG:3857) tiling scheme.
///
/// One tile at zoom 0 covering the world, quadrupling per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercatorTilingScheme;

impl WebMercatorTilingScheme {
    /// Create a new Web Mercator tiling scheme.
    pub fn new() -> Self {
        Self
    }
}

impl TilingScheme for WebMercatorTilingScheme {
    fn rectangle(&self) -> Rectangle {
        Rectangle::world()
    }

    fn position_to_tile(&self, lon: f64, lat: f64, zoom: u8) -> Result<TileCoord, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        if zoom > 30 {
            return Err(CoordError::InvalidZoom(zoom));
        }

        let n = 2.0_f64.powi(zoom as i32);

        // Longitude maps linearly; latitude through the Mercator stretch.
        let x = ((lon + 180.0) / 360.0 * n) as u32;
        let lat_rad = lat * PI / 180.0;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

        // Positions exactly on the east/south edge land one past the last
        // tile index; clamp back inside the grid.
        let max_index = (n as u32).saturating_sub(1);
        Ok(TileCoord {
            x: x.min(max_index),
            y: y.min(max_index),
            z: zoom,
        })
    }

    fn tile_rectangle(&self, tile: &TileCoord) -> Rectangle {
        let n = 2.0_f64.powi(tile.z as i32);

        let lon_at = |x: f64| x / n * 360.0 - 180.0;
        let lat_at = |y: f64| {
            let lat_rad = (PI * (1.0 - 2.0 * y / n)).sinh().atan();
            lat_rad * 180.0 / PI
        };

        Rectangle {
            west: lon_at(tile.x as f64),
            east: lon_at(tile.x as f64 + 1.0),
            north: lat_at(tile.y as f64),
            south: lat_at(tile.y as f64 + 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_tile_contains_everything() {
        let scheme = WebMercatorTilingScheme::new();
        let tile = scheme.position_to_tile(-74.0060, 40.7128, 0).unwrap();
        assert_eq!(tile, TileCoord::new(0, 0, 0));
    }

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let scheme = WebMercatorTilingScheme::new();
        let tile = scheme.position_to_tile(-74.0060, 40.7128, 16).unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.z, 16);
    }

    #[test]
    fn test_invalid_latitude() {
        let scheme = WebMercatorTilingScheme::new();
        let result = scheme.position_to_tile(0.0, 90.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_antimeridian_edges_stay_in_grid() {
        let scheme = WebMercatorTilingScheme::new();
        let east = scheme.position_to_tile(180.0, 0.0, 4).unwrap();
        assert_eq!(east.x, 15, "east edge clamps to the last column");
        let west = scheme.position_to_tile(-180.0, 0.0, 4).unwrap();
        assert_eq!(west.x, 0);
    }

    #[test]
    fn test_tile_rectangle_roundtrip() {
        let scheme = WebMercatorTilingScheme::new();
        let tile = scheme.position_to_tile(-0.1278, 51.5074, 12).unwrap();
        let rect = scheme.tile_rectangle(&tile);
        assert!(rect.contains(-0.1278, 51.5074));

        // The tile's own center must map back to the same tile.
        let center_lon = (rect.west + rect.east) / 2.0;
        let center_lat = (rect.south + rect.north) / 2.0;
        let again = scheme
            .position_to_tile(center_lon, center_lat, 12)
            .unwrap();
        assert_eq!(again, tile);
    }

    #[test]
    fn test_world_rectangle_at_zoom_zero() {
        let scheme = WebMercatorTilingScheme::new();
        let rect = scheme.tile_rectangle(&TileCoord::new(0, 0, 0));
        assert!((rect.west - -180.0).abs() < 1e-9);
        assert!((rect.east - 180.0).abs() < 1e-9);
        assert!((rect.north - MAX_LAT).abs() < 1e-6);
        assert!((rect.south - MIN_LAT).abs() < 1e-6);
    }
}
