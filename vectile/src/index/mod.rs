//! On-demand tile index
//!
//! Lazily partitions an untiled document into a quad-tree of discrete
//! tiles. The document's features are projected into world space once at
//! build time; each requested tile's feature subset is derived from its
//! parent tile by rectangle clipping with a configurable buffer, and
//! memoized so sibling and descendant requests reuse the work.
//!
//! # Thread Safety
//!
//! The index is immutable after build apart from the per-tile memo table,
//! which lives in a `DashMap`. Concurrent requests for the same tile may
//! race to compute the same subset; the computation is idempotent and the
//! last write wins, so no locking beyond the map's shards is needed.

mod clip;
mod project;
mod tile;

pub use tile::{IndexTile, TileFeature};

use std::sync::Arc;

use dashmap::DashMap;
use geo::Coord;
use tracing::{debug, info, trace};

use crate::coord::{TileCoord, MAX_TILE_ZOOM};
use crate::document::Document;
use crate::geom::GeomKind;
use tile::WorldFeature;

/// Tile index configuration.
///
/// The defaults mirror common vector-tile practice: a 4096-unit extent
/// with a 64-pixel buffer at a 256-pixel tile, i.e. 1024 extent units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    /// Coordinate extent of generated tiles
    pub extent: u16,
    /// Buffer around each tile, in extent units
    pub buffer: u16,
    /// Deepest zoom level at which the quad-tree subdivides
    pub max_zoom: u8,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            extent: 4096,
            buffer: 1024,
            max_zoom: MAX_TILE_ZOOM,
        }
    }
}

impl IndexOptions {
    /// Set the tile coordinate extent.
    pub fn with_extent(mut self, extent: u16) -> Self {
        self.extent = extent;
        self
    }

    /// Set the buffer in extent units.
    pub fn with_buffer(mut self, buffer: u16) -> Self {
        self.buffer = buffer;
        self
    }

    /// Set the deepest subdivision zoom.
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom.min(MAX_TILE_ZOOM);
        self
    }
}

/// Quad-tree tile index over an untiled document.
///
/// Built once per document; serves `get_tile(z, x, y)` afterwards. Tiles
/// with no features are absent, not an error.
#[derive(Debug)]
pub struct TileIndex {
    options: IndexOptions,
    root: Arc<Vec<Arc<WorldFeature>>>,
    subsets: DashMap<TileCoord, Arc<Vec<Arc<WorldFeature>>>>,
}

impl TileIndex {
    /// Build the index from a document.
    ///
    /// Projects every feature into world space and seeds the quad-tree
    /// root; subdivision happens lazily per requested tile.
    pub fn build(document: &Document, options: IndexOptions) -> Self {
        let mut root = Vec::with_capacity(document.len());
        for feature in document.features() {
            for (kind, paths) in project::world_paths(feature.geometry()) {
                match WorldFeature::new(kind, paths, feature.tags().clone()) {
                    Some(world) => root.push(Arc::new(world)),
                    None => debug!("dropping feature with empty geometry from index"),
                }
            }
        }
        info!(
            features = root.len(),
            extent = options.extent,
            buffer = options.buffer,
            "built tile index"
        );
        Self {
            options,
            root: Arc::new(root),
            subsets: DashMap::new(),
        }
    }

    /// The index configuration.
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// The tile at (z, x, y), or `None` if no features overlap it.
    ///
    /// Output geometry is tile-local in extent units. Zoom levels deeper
    /// than the configured maximum are served by re-slicing the deepest
    /// ancestor's feature set at the requested coordinates.
    pub fn get_tile(&self, coord: TileCoord) -> Option<Arc<IndexTile>> {
        let subset = if coord.z <= self.options.max_zoom {
            self.subset(coord)
        } else {
            // Below maximum depth: slice the deepest available tile's data
            // at the requested coordinates, without caching.
            let ancestor = coord.ancestor(self.options.max_zoom);
            trace!(tile = %coord, ancestor = %ancestor, "slicing below max zoom");
            Arc::new(self.clip_to_tile(&self.subset(ancestor), coord))
        };
        if subset.is_empty() {
            return None;
        }

        let n = 2.0_f64.powi(coord.z as i32);
        let extent = self.options.extent as f64;
        let features = subset
            .iter()
            .map(|f| TileFeature {
                kind: f.kind,
                geometry: f
                    .paths
                    .iter()
                    .map(|path| {
                        path.iter()
                            .map(|c| Coord {
                                x: (c.x * n - coord.x as f64) * extent,
                                y: (c.y * n - coord.y as f64) * extent,
                            })
                            .collect()
                    })
                    .collect(),
                tags: f.tags.clone(),
            })
            .collect();
        Some(Arc::new(IndexTile { features }))
    }

    /// The world-space feature subset for a tile at or above max zoom,
    /// memoized per coordinate.
    fn subset(&self, coord: TileCoord) -> Arc<Vec<Arc<WorldFeature>>> {
        if coord.z == 0 {
            return self.root.clone();
        }
        if let Some(cached) = self.subsets.get(&coord) {
            return cached.clone();
        }
        // Parent is always present: recursion terminates at the root.
        let parent = match coord.parent() {
            Some(p) => self.subset(p),
            None => self.root.clone(),
        };
        let subset = Arc::new(self.clip_to_tile(&parent, coord));
        trace!(tile = %coord, features = subset.len(), "computed tile subset");
        self.subsets.insert(coord, subset.clone());
        subset
    }

    /// Clip features to a tile's buffered world-space bounds.
    fn clip_to_tile(
        &self,
        features: &[Arc<WorldFeature>],
        coord: TileCoord,
    ) -> Vec<Arc<WorldFeature>> {
        let (min, max) = self.buffered_bounds(coord);
        features
            .iter()
            .filter_map(|f| {
                // Quick reject on the cached bounds.
                if f.max.x < min.x || f.min.x > max.x || f.max.y < min.y || f.min.y > max.y {
                    return None;
                }
                // Fully contained features are shared, not copied.
                if f.min.x >= min.x && f.max.x <= max.x && f.min.y >= min.y && f.max.y <= max.y {
                    return Some(f.clone());
                }
                let clipped = match f.kind {
                    GeomKind::Point => clip::clip_points(&f.paths, min, max),
                    GeomKind::Line => clip::clip_lines(&f.paths, min, max),
                    GeomKind::Polygon => clip::clip_rings(&f.paths, min, max),
                };
                WorldFeature::new(f.kind, clipped, f.tags.clone()).map(Arc::new)
            })
            .collect()
    }

    /// Buffered bounds of a tile in world units.
    fn buffered_bounds(&self, coord: TileCoord) -> (Coord<f64>, Coord<f64>) {
        let size = 1.0 / 2.0_f64.powi(coord.z as i32);
        let buf = size * self.options.buffer as f64 / self.options.extent as f64;
        (
            Coord {
                x: coord.x as f64 * size - buf,
                y: coord.y as f64 * size - buf,
            },
            Coord {
                x: (coord.x as f64 + 1.0) * size + buf,
                y: (coord.y as f64 + 1.0) * size + buf,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{TilingScheme, WebMercatorTilingScheme};
    use crate::document::Document;

    fn document(body: &str) -> Document {
        Document::from_geojson_str(body).expect("test document parses")
    }

    fn point_document() -> Document {
        document(
            r#"{
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [10.0, 10.0] },
                    "properties": { "name": "marker" }
                }]
            }"#,
        )
    }

    #[test]
    fn test_root_tile_has_all_features() {
        let index = TileIndex::build(&point_document(), IndexOptions::default());
        let tile = index.get_tile(TileCoord::new(0, 0, 0)).unwrap();
        assert_eq!(tile.features.len(), 1);
        assert_eq!(tile.features[0].kind, GeomKind::Point);
    }

    #[test]
    fn test_point_lands_in_expected_tile() {
        let index = TileIndex::build(&point_document(), IndexOptions::default());
        let scheme = WebMercatorTilingScheme::new();
        let coord = scheme.position_to_tile(10.0, 10.0, 5).unwrap();
        let tile = index.get_tile(coord).unwrap();
        assert_eq!(tile.features.len(), 1);
        // Tile-local coordinates stay within the buffered extent.
        let c = tile.features[0].geometry[0][0];
        assert!(c.x >= -1024.0 && c.x <= 4096.0 + 1024.0);
        assert!(c.y >= -1024.0 && c.y <= 4096.0 + 1024.0);
    }

    #[test]
    fn test_far_away_tile_is_absent() {
        let index = TileIndex::build(&point_document(), IndexOptions::default());
        // Opposite side of the world at zoom 5.
        assert!(index.get_tile(TileCoord::new(1, 1, 5)).is_none());
    }

    #[test]
    fn test_boundary_polygon_appears_in_both_tiles() {
        // Polygon straddling the prime meridian shows up in the west and
        // east zoom-1 tiles thanks to the buffer.
        let doc = document(
            r#"{
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-5,-5],[5,-5],[5,5],[-5,5],[-5,-5]]]
                    },
                    "properties": {}
                }]
            }"#,
        );
        let index = TileIndex::build(&doc, IndexOptions::default());
        assert!(index.get_tile(TileCoord::new(0, 0, 1)).is_some());
        assert!(index.get_tile(TileCoord::new(1, 0, 1)).is_some());
        assert!(index.get_tile(TileCoord::new(0, 1, 1)).is_some());
        assert!(index.get_tile(TileCoord::new(1, 1, 1)).is_some());
    }

    #[test]
    fn test_subsets_are_memoized() {
        let index = TileIndex::build(&point_document(), IndexOptions::default());
        let coord = TileCoord::new(0, 0, 3);
        let _ = index.get_tile(coord);
        let before = index.subsets.len();
        let _ = index.get_tile(coord);
        assert_eq!(index.subsets.len(), before, "repeat requests reuse subsets");
    }

    #[test]
    fn test_below_max_zoom_reslices_deepest_tile() {
        let options = IndexOptions::default().with_max_zoom(4);
        let index = TileIndex::build(&point_document(), options);
        let scheme = WebMercatorTilingScheme::new();
        let deep = scheme.position_to_tile(10.0, 10.0, 8).unwrap();
        let tile = index.get_tile(deep).expect("deep request is served");
        assert_eq!(tile.features.len(), 1);
        // Deep coordinates are in the requested tile's frame.
        let c = tile.features[0].geometry[0][0];
        assert!(c.x >= -1024.0 && c.x <= 4096.0 + 1024.0);
    }

    #[test]
    fn test_empty_document_has_no_tiles() {
        let doc = Document::new(vec![]);
        let index = TileIndex::build(&doc, IndexOptions::default());
        assert!(index.get_tile(TileCoord::new(0, 0, 0)).is_none());
    }

    #[test]
    fn test_options_builder() {
        let options = IndexOptions::default()
            .with_extent(8192)
            .with_buffer(512)
            .with_max_zoom(30);
        assert_eq!(options.extent, 8192);
        assert_eq!(options.buffer, 512);
        assert_eq!(options.max_zoom, MAX_TILE_ZOOM, "max zoom is capped");
    }
}
