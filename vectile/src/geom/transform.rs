//! Tile-local to pixel-space geometry transform.

use geo::Coord;

use super::types::{PixelBbox, TransformedGeometry};

/// Map tile-local geometry into pixel space at a target tile size.
///
/// Every coordinate in `paths` (rings for polygons, paths for lines, a
/// single path for points) is scaled by `target_size / source_extent`,
/// accumulating the pixel-space bounding box and total vertex count along
/// the way. The input is not mutated; the output is the only allocation.
///
/// Empty geometry leaves the bbox at its sentinel; callers check
/// [`PixelBbox::is_degenerate`] and exclude such features from output.
pub fn transform(
    paths: &[Vec<Coord<f64>>],
    source_extent: f64,
    target_size: f64,
) -> TransformedGeometry {
    let scale = target_size / source_extent;
    let mut bbox = PixelBbox::EMPTY;
    let mut num_vertices = 0;

    let transformed = paths
        .iter()
        .map(|path| {
            num_vertices += path.len();
            path.iter()
                .map(|c| {
                    let scaled = Coord {
                        x: c.x * scale,
                        y: c.y * scale,
                    };
                    bbox.extend(scaled);
                    scaled
                })
                .collect()
        })
        .collect();

    TransformedGeometry {
        paths: transformed,
        bbox,
        num_vertices,
    }
}
