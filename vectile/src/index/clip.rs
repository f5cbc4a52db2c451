//! Axis-aligned rectangle clipping in world space.
//!
//! Three clippers, one per geometry kind: points are filtered, polylines
//! are cut into runs (a path crossing the rectangle twice yields two
//! output paths), polygon rings go through Sutherland–Hodgman against the
//! rectangle's four half-planes.

use geo::Coord;

/// Retain the points inside the rectangle. Paths that end up empty are
/// dropped.
pub(crate) fn clip_points(
    paths: &[Vec<Coord<f64>>],
    min: Coord<f64>,
    max: Coord<f64>,
) -> Vec<Vec<Coord<f64>>> {
    paths
        .iter()
        .map(|path| {
            path.iter()
                .copied()
                .filter(|c| c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y)
                .collect::<Vec<_>>()
        })
        .filter(|path: &Vec<Coord<f64>>| !path.is_empty())
        .collect()
}

/// Clip a segment to the rectangle (Liang–Barsky).
///
/// Returns the clipped endpoints, or `None` when the segment misses the
/// rectangle entirely.
fn clip_segment(
    a: Coord<f64>,
    b: Coord<f64>,
    min: Coord<f64>,
    max: Coord<f64>,
) -> Option<(Coord<f64>, Coord<f64>)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.x - min.x),
        (dx, max.x - a.x),
        (-dy, a.y - min.y),
        (dy, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    Some((
        Coord {
            x: a.x + t0 * dx,
            y: a.y + t0 * dy,
        },
        Coord {
            x: a.x + t1 * dx,
            y: a.y + t1 * dy,
        },
    ))
}

#[inline]
fn same_point(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
}

/// Clip polylines to the rectangle, splitting paths where they leave it.
pub(crate) fn clip_lines(
    paths: &[Vec<Coord<f64>>],
    min: Coord<f64>,
    max: Coord<f64>,
) -> Vec<Vec<Coord<f64>>> {
    let mut out = Vec::new();
    for path in paths {
        let mut run: Vec<Coord<f64>> = Vec::new();
        for pair in path.windows(2) {
            match clip_segment(pair[0], pair[1], min, max) {
                Some((start, end)) => {
                    match run.last() {
                        Some(&last) if same_point(last, start) => {}
                        Some(_) => {
                            // Re-entered after leaving: close the previous run.
                            out.push(std::mem::take(&mut run));
                            run.push(start);
                        }
                        None => run.push(start),
                    }
                    run.push(end);
                }
                None => {
                    if !run.is_empty() {
                        out.push(std::mem::take(&mut run));
                    }
                }
            }
        }
        if !run.is_empty() {
            out.push(run);
        }
    }
    out.retain(|run| run.len() >= 2);
    out
}

/// One rectangle edge as a half-plane keep-test plus an intersection.
#[derive(Clone, Copy)]
enum Edge {
    West(f64),
    East(f64),
    North(f64),
    South(f64),
}

impl Edge {
    #[inline]
    fn inside(&self, c: Coord<f64>) -> bool {
        match *self {
            Edge::West(x) => c.x >= x,
            Edge::East(x) => c.x <= x,
            Edge::North(y) => c.y >= y,
            Edge::South(y) => c.y <= y,
        }
    }

    #[inline]
    fn intersect(&self, a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
        match *self {
            Edge::West(x) | Edge::East(x) => {
                let t = (x - a.x) / (b.x - a.x);
                Coord {
                    x,
                    y: a.y + t * (b.y - a.y),
                }
            }
            Edge::North(y) | Edge::South(y) => {
                let t = (y - a.y) / (b.y - a.y);
                Coord {
                    x: a.x + t * (b.x - a.x),
                    y,
                }
            }
        }
    }
}

fn clip_ring_edge(ring: &[Coord<f64>], edge: Edge) -> Vec<Coord<f64>> {
    let mut out = Vec::with_capacity(ring.len() + 4);
    for i in 0..ring.len() {
        let current = ring[i];
        let previous = ring[(i + ring.len() - 1) % ring.len()];
        let current_in = edge.inside(current);
        let previous_in = edge.inside(previous);
        if current_in {
            if !previous_in {
                out.push(edge.intersect(previous, current));
            }
            out.push(current);
        } else if previous_in {
            out.push(edge.intersect(previous, current));
        }
    }
    out
}

/// Sutherland–Hodgman ring clipping against the rectangle.
///
/// Input rings may carry the GeoJSON closing duplicate; output rings are
/// closed. Rings reduced below a triangle are dropped.
pub(crate) fn clip_rings(
    rings: &[Vec<Coord<f64>>],
    min: Coord<f64>,
    max: Coord<f64>,
) -> Vec<Vec<Coord<f64>>> {
    let edges = [
        Edge::West(min.x),
        Edge::East(max.x),
        Edge::North(min.y),
        Edge::South(max.y),
    ];
    rings
        .iter()
        .filter_map(|ring| {
            // Work on the open ring; re-close at the end.
            let mut open: Vec<Coord<f64>> = ring.clone();
            if open.len() > 1 {
                if let (Some(&first), Some(&last)) = (open.first(), open.last()) {
                    if same_point(first, last) {
                        open.pop();
                    }
                }
            }
            for edge in edges {
                open = clip_ring_edge(&open, edge);
                if open.is_empty() {
                    return None;
                }
            }
            if open.len() < 3 {
                return None;
            }
            if let Some(&first) = open.first() {
                open.push(first);
            }
            Some(open)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    const MIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
    const MAX: Coord<f64> = Coord { x: 10.0, y: 10.0 };

    // =========================================================================
    // Points
    // =========================================================================

    #[test]
    fn test_clip_points_filters_outside() {
        let paths = vec![vec![c(5.0, 5.0), c(15.0, 5.0), c(0.0, 10.0)]];
        let out = clip_points(&paths, MIN, MAX);
        assert_eq!(out, vec![vec![c(5.0, 5.0), c(0.0, 10.0)]]);
    }

    #[test]
    fn test_clip_points_drops_empty_paths() {
        let paths = vec![vec![c(20.0, 20.0)]];
        assert!(clip_points(&paths, MIN, MAX).is_empty());
    }

    // =========================================================================
    // Segments and polylines
    // =========================================================================

    #[test]
    fn test_clip_segment_fully_inside() {
        let out = clip_segment(c(1.0, 1.0), c(9.0, 9.0), MIN, MAX);
        assert_eq!(out, Some((c(1.0, 1.0), c(9.0, 9.0))));
    }

    #[test]
    fn test_clip_segment_crossing() {
        let out = clip_segment(c(-5.0, 5.0), c(15.0, 5.0), MIN, MAX).unwrap();
        assert_eq!(out.0, c(0.0, 5.0));
        assert_eq!(out.1, c(10.0, 5.0));
    }

    #[test]
    fn test_clip_segment_outside() {
        assert!(clip_segment(c(-5.0, -5.0), c(-1.0, -1.0), MIN, MAX).is_none());
    }

    #[test]
    fn test_clip_lines_splits_reentrant_path() {
        // Path dips out of the rectangle and comes back: two runs.
        let paths = vec![vec![
            c(1.0, 5.0),
            c(4.0, 5.0),
            c(5.0, 20.0),
            c(6.0, 5.0),
            c(9.0, 5.0),
        ]];
        let out = clip_lines(&paths, MIN, MAX);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0][0], c(1.0, 5.0));
        assert_eq!(out[1].last().copied(), Some(c(9.0, 5.0)));
    }

    #[test]
    fn test_clip_lines_keeps_interior_path_untouched() {
        let paths = vec![vec![c(1.0, 1.0), c(2.0, 2.0), c(3.0, 1.0)]];
        let out = clip_lines(&paths, MIN, MAX);
        assert_eq!(out, paths);
    }

    #[test]
    fn test_clip_lines_drops_disjoint_path() {
        let paths = vec![vec![c(20.0, 20.0), c(30.0, 30.0)]];
        assert!(clip_lines(&paths, MIN, MAX).is_empty());
    }

    // =========================================================================
    // Rings
    // =========================================================================

    #[test]
    fn test_clip_rings_interior_ring_untouched() {
        let ring = vec![c(2.0, 2.0), c(8.0, 2.0), c(8.0, 8.0), c(2.0, 8.0), c(2.0, 2.0)];
        let out = clip_rings(&[ring.clone()], MIN, MAX);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].first(), out[0].last());
        // Same area covered: all original vertices survive.
        for v in &ring {
            assert!(out[0].iter().any(|o| (o.x - v.x).abs() < 1e-12 && (o.y - v.y).abs() < 1e-12));
        }
    }

    #[test]
    fn test_clip_rings_overlapping_square_is_cut() {
        // Square half inside: clipped to the overlap.
        let ring = vec![c(5.0, 5.0), c(15.0, 5.0), c(15.0, 8.0), c(5.0, 8.0), c(5.0, 5.0)];
        let out = clip_rings(&[ring], MIN, MAX);
        assert_eq!(out.len(), 1);
        let max_x = out[0].iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max_x, 10.0);
    }

    #[test]
    fn test_clip_rings_disjoint_is_dropped() {
        let ring = vec![c(20.0, 20.0), c(30.0, 20.0), c(30.0, 30.0), c(20.0, 20.0)];
        assert!(clip_rings(&[ring], MIN, MAX).is_empty());
    }

    #[test]
    fn test_clip_rings_surrounding_ring_becomes_rectangle() {
        // Ring fully containing the clip rect collapses to the rect itself.
        let ring = vec![
            c(-10.0, -10.0),
            c(20.0, -10.0),
            c(20.0, 20.0),
            c(-10.0, 20.0),
            c(-10.0, -10.0),
        ];
        let out = clip_rings(&[ring], MIN, MAX);
        assert_eq!(out.len(), 1);
        for p in &out[0] {
            assert!(p.x >= 0.0 && p.x <= 10.0);
            assert!(p.y >= 0.0 && p.y <= 10.0);
        }
    }
}
