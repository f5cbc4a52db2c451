//! Geodesic buffer polygon construction.

use geo::{Coord, Destination, Haversine, LineString, Point, Polygon};

/// Build an N-sided polygon approximating a circle of `radius_m` meters
/// around (lon, lat).
///
/// Each vertex is a Haversine destination from the center, so the shape is
/// geodesically sized rather than a degree-space ellipse. A small step
/// count keeps intersection tests cheap; the resulting coarseness is an
/// accepted precision/performance trade-off.
pub(crate) fn circle_polygon(lon: f64, lat: f64, radius_m: f64, steps: usize) -> Polygon<f64> {
    let center = Point::new(lon, lat);
    let mut ring: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let bearing = i as f64 * 360.0 / steps as f64;
            let p = Haversine::destination(center, bearing, radius_m);
            // Keep the ring continuous around the center: a vertex that
            // came back normalized to the far side of the antimeridian is
            // shifted into the center's frame.
            let mut x = p.x();
            if x - lon > 180.0 {
                x -= 360.0;
            } else if lon - x > 180.0 {
                x += 360.0;
            }
            Coord { x, y: p.y() }
        })
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    Polygon::new(LineString(ring), vec![])
}

/// Copy of the polygon with every negative longitude shifted into the
/// 0..360 convention.
///
/// Used to test intersection against features whose own bounds already
/// cross past 180°.
pub(crate) fn wrap_east(polygon: &Polygon<f64>) -> Polygon<f64> {
    let shift = |c: &Coord<f64>| Coord {
        x: if c.x < 0.0 { c.x + 360.0 } else { c.x },
        y: c.y,
    };
    let exterior = LineString(polygon.exterior().0.iter().map(shift).collect());
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| LineString(ring.0.iter().map(shift).collect()))
        .collect();
    Polygon::new(exterior, interiors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Intersects;

    #[test]
    fn test_circle_is_closed_with_expected_vertices() {
        let poly = circle_polygon(10.0, 10.0, 1000.0, 10);
        let ring = poly.exterior();
        assert_eq!(ring.0.len(), 11, "10 sides plus closing point");
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn test_circle_surrounds_center() {
        let poly = circle_polygon(10.0, 10.0, 1000.0, 10);
        assert!(poly.intersects(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_circle_radius_in_degrees_is_plausible() {
        // 111 km is roughly one degree of latitude.
        let poly = circle_polygon(0.0, 0.0, 111_000.0, 10);
        let max_lat = poly
            .exterior()
            .0
            .iter()
            .map(|c| c.y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((max_lat - 1.0).abs() < 0.05, "got {max_lat}");
    }

    #[test]
    fn test_wrap_east_shifts_only_negative_longitudes() {
        let poly = circle_polygon(-179.9, 0.0, 50_000.0, 10);
        let wrapped = wrap_east(&poly);
        for c in &wrapped.exterior().0 {
            assert!(c.x >= 0.0, "wrapped longitude {} is negative", c.x);
        }
        // Points west of the seam now sit just above 180.
        let min_x = wrapped
            .exterior()
            .0
            .iter()
            .map(|c| c.x)
            .fold(f64::INFINITY, f64::min);
        assert!(min_x > 179.0);
    }
}
