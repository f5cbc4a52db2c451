//! Tile index output and internal feature types.

use std::sync::Arc;

use geo::Coord;

use crate::document::Tags;
use crate::geom::GeomKind;

/// A feature inside an index tile.
///
/// Geometry is tile-local in extent units (0..extent across the tile, with
/// buffered coordinates running slightly outside that range).
#[derive(Debug, Clone)]
pub struct TileFeature {
    /// Geometry kind carried from the source document
    pub kind: GeomKind,
    /// Rings or paths in extent units relative to the tile origin
    pub geometry: Vec<Vec<Coord<f64>>>,
    /// Property bag shared with the document feature
    pub tags: Arc<Tags>,
}

/// One tile's worth of features.
#[derive(Debug, Clone)]
pub struct IndexTile {
    /// Features overlapping the tile, in document order
    pub features: Vec<TileFeature>,
}

/// A feature projected into world space, the index's internal currency.
///
/// The bounding box is computed once at build/clip time and drives the
/// quick reject during subdivision.
#[derive(Debug, Clone)]
pub(crate) struct WorldFeature {
    pub kind: GeomKind,
    pub paths: Vec<Vec<Coord<f64>>>,
    pub tags: Arc<Tags>,
    pub min: Coord<f64>,
    pub max: Coord<f64>,
}

impl WorldFeature {
    /// Build a world feature, computing its bounds.
    ///
    /// Returns `None` for geometry with no coordinates.
    pub(crate) fn new(
        kind: GeomKind,
        paths: Vec<Vec<Coord<f64>>>,
        tags: Arc<Tags>,
    ) -> Option<Self> {
        let mut min = Coord {
            x: f64::INFINITY,
            y: f64::INFINITY,
        };
        let mut max = Coord {
            x: f64::NEG_INFINITY,
            y: f64::NEG_INFINITY,
        };
        let mut seen = false;
        for path in &paths {
            for c in path {
                seen = true;
                min.x = min.x.min(c.x);
                min.y = min.y.min(c.y);
                max.x = max.x.max(c.x);
                max.y = max.y.max(c.y);
            }
        }
        if !seen {
            return None;
        }
        Some(Self {
            kind,
            paths,
            tags,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_feature_bounds() {
        let paths = vec![vec![
            Coord { x: 0.25, y: 0.5 },
            Coord { x: 0.75, y: 0.1 },
        ]];
        let f = WorldFeature::new(GeomKind::Line, paths, Arc::new(Tags::new())).unwrap();
        assert_eq!(f.min, Coord { x: 0.25, y: 0.1 });
        assert_eq!(f.max, Coord { x: 0.75, y: 0.5 });
    }

    #[test]
    fn test_world_feature_empty_is_none() {
        assert!(WorldFeature::new(GeomKind::Point, vec![], Arc::new(Tags::new())).is_none());
        assert!(WorldFeature::new(GeomKind::Line, vec![vec![]], Arc::new(Tags::new())).is_none());
    }
}
