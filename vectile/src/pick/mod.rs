//! Antimeridian-safe spatial query
//!
//! Point-radius feature lookups against an untiled document's full feature
//! set, independent of tiling. A geodesic buffer polygon is built around
//! the query point together with a wrapped (+360°) copy, so features
//! stored in the 0..360 longitude convention (the ones whose bounds cross
//! the antimeridian) are tested in their own frame.
//!
//! Results follow document order; callers wanting nearest-first sort
//! themselves.

mod buffer;

use std::sync::Arc;

use geo::{BoundingRect, Intersects, Polygon, Rect};
use tracing::trace;

use crate::document::{Document, Feature};

/// Sides of the buffer polygon. Coarser than a true circle; deliberate
/// precision/performance trade-off.
pub const BUFFER_STEPS: usize = 10;

/// Find all features whose geometry intersects a geodesic buffer of
/// `radius_m` meters around (lon, lat).
///
/// Absence of matches is an empty result, not an error. Each feature's
/// degree-space bounding box is computed lazily and cached on the feature;
/// the box-overlap pre-test only prunes candidates; the exact
/// intersection test is authoritative.
pub fn pick(document: &Document, lon: f64, lat: f64, radius_m: f64) -> Vec<Arc<Feature>> {
    let buffer = buffer::circle_polygon(lon, lat, radius_m, BUFFER_STEPS);
    let wrapped = buffer::wrap_east(&buffer);
    let Some(buffer_bbox) = buffer.bounding_rect() else {
        return Vec::new();
    };

    let mut picked = Vec::new();
    for feature in document.features() {
        let Some(feature_bbox) = feature.bbox() else {
            continue;
        };
        if !boxes_overlap(&feature_bbox, &buffer_bbox) {
            continue;
        }
        let crosses_seam = feature_bbox.min().x > 180.0 || feature_bbox.max().x > 180.0;
        let probe: &Polygon<f64> = if crosses_seam { &wrapped } else { &buffer };
        if feature.geometry().intersects(probe) {
            picked.push(feature.clone());
        }
    }
    trace!(
        lon,
        lat,
        radius_m,
        matches = picked.len(),
        "pick query complete"
    );
    picked
}

/// Conservative box-overlap pre-test.
///
/// The buffer box edge is shifted +360 whenever the corresponding feature
/// box edge lies past 180°, matching the wrapped-buffer convention used by
/// the exact test. Every feature the exact test accepts must pass here.
pub(crate) fn boxes_overlap(feature: &Rect<f64>, buffer: &Rect<f64>) -> bool {
    let buffer_min_x = if feature.min().x > 180.0 {
        buffer.min().x + 360.0
    } else {
        buffer.min().x
    };
    let buffer_max_x = if feature.max().x > 180.0 {
        buffer.max().x + 360.0
    } else {
        buffer.max().x
    };
    feature.min().x.max(buffer_min_x) <= feature.max().x.min(buffer_max_x)
        && feature.min().y.max(buffer.min().y) <= feature.max().y.min(buffer.max().y)
}
