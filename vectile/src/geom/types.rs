//! Geometry kinds, pixel-space bounding boxes, and transformed features.

use std::sync::Arc;

use geo::Coord;

use crate::document::Tags;

/// Explicit geometry kind carried alongside raw coordinates.
///
/// The kind always travels with the geometry from the source; it is never
/// inferred from coordinate nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeomKind {
    /// Point or multi-point
    Point,
    /// Line string or multi-line string
    Line,
    /// Polygon or multi-polygon (rings)
    Polygon,
}

impl GeomKind {
    /// Numeric code in the vector-tile convention (1 point, 2 line,
    /// 3 polygon), for painters that key on it.
    pub fn code(&self) -> u8 {
        match self {
            GeomKind::Point => 1,
            GeomKind::Line => 2,
            GeomKind::Polygon => 3,
        }
    }
}

/// Axis-aligned bounding box in pixel space.
///
/// Starts at the `(+∞, +∞, −∞, −∞)` sentinel and grows as coordinates are
/// accumulated. A box still at the sentinel is degenerate: the geometry had
/// no coordinates, and the feature is excluded from output.
///
/// This type is pixel-space only. Degree-space feature boxes in the picking
/// pipeline use `geo::Rect` and the two are never interchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PixelBbox {
    /// The empty sentinel box.
    pub const EMPTY: PixelBbox = PixelBbox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// Grow the box to include a coordinate.
    #[inline]
    pub fn extend(&mut self, c: Coord<f64>) {
        if c.x < self.min_x {
            self.min_x = c.x;
        }
        if c.x > self.max_x {
            self.max_x = c.x;
        }
        if c.y < self.min_y {
            self.min_y = c.y;
        }
        if c.y > self.max_y {
            self.max_y = c.y;
        }
    }

    /// Whether the box never saw a coordinate.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

impl Default for PixelBbox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Geometry mapped into pixel space, with its accumulated bounds and
/// vertex count.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedGeometry {
    /// Rings or paths in pixel coordinates
    pub paths: Vec<Vec<Coord<f64>>>,
    /// Bounding box accumulated over all transformed coordinates
    pub bbox: PixelBbox,
    /// Total number of vertices across all rings/paths
    pub num_vertices: usize,
}

/// A feature ready for the rasterizing painter.
///
/// Geometry is in pixel space at the tile size requested from the source;
/// the vertex count feeds the renderer's level-of-detail decisions.
#[derive(Debug, Clone)]
pub struct TransformedFeature {
    /// Geometry kind, carried through from the source
    pub kind: GeomKind,
    /// Rings or paths in pixel coordinates
    pub geom: Vec<Vec<Coord<f64>>>,
    /// Property bag shared with the source feature
    pub tags: Arc<Tags>,
    /// Pixel-space bounding box
    pub bbox: PixelBbox,
    /// Total vertex count
    pub num_vertices: usize,
}
