//! Projection of document geometry into world space.
//!
//! The tile index works in "world space": the whole Web Mercator plane
//! mapped to the unit square, with x growing east and y growing south. A
//! tile (z, x, y) covers the square `[x/2^z, (x+1)/2^z] × [y/2^z, (y+1)/2^z]`.

use std::f64::consts::PI;

use geo::{Coord, Geometry, LineString};

use crate::geom::GeomKind;

/// Project (lon, lat) degrees into the unit world square.
///
/// Latitudes beyond the Mercator range clamp to the square's edge.
#[inline]
pub(crate) fn project(lon: f64, lat: f64) -> Coord<f64> {
    let x = lon / 360.0 + 0.5;
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    Coord {
        x,
        y: y.clamp(0.0, 1.0),
    }
}

fn project_line(line: &LineString<f64>) -> Vec<Coord<f64>> {
    line.0.iter().map(|c| project(c.x, c.y)).collect()
}

/// Flatten a geometry into world-space paths, each carrying its explicit
/// geometry kind.
///
/// Multi-part geometries keep their kind and contribute all parts; a
/// geometry collection contributes one entry per member.
pub(crate) fn world_paths(geometry: &Geometry<f64>) -> Vec<(GeomKind, Vec<Vec<Coord<f64>>>)> {
    match geometry {
        Geometry::Point(p) => vec![(GeomKind::Point, vec![vec![project(p.x(), p.y())]])],
        Geometry::MultiPoint(mp) => {
            let path = mp.0.iter().map(|p| project(p.x(), p.y())).collect();
            vec![(GeomKind::Point, vec![path])]
        }
        Geometry::Line(line) => {
            let path = vec![
                project(line.start.x, line.start.y),
                project(line.end.x, line.end.y),
            ];
            vec![(GeomKind::Line, vec![path])]
        }
        Geometry::LineString(ls) => vec![(GeomKind::Line, vec![project_line(ls)])],
        Geometry::MultiLineString(mls) => {
            let paths = mls.0.iter().map(project_line).collect();
            vec![(GeomKind::Line, paths)]
        }
        Geometry::Polygon(poly) => {
            let mut rings = vec![project_line(poly.exterior())];
            rings.extend(poly.interiors().iter().map(project_line));
            vec![(GeomKind::Polygon, rings)]
        }
        Geometry::MultiPolygon(mp) => {
            let mut rings = Vec::new();
            for poly in &mp.0 {
                rings.push(project_line(poly.exterior()));
                rings.extend(poly.interiors().iter().map(project_line));
            }
            vec![(GeomKind::Polygon, rings)]
        }
        Geometry::Rect(rect) => world_paths(&Geometry::Polygon(rect.to_polygon())),
        Geometry::Triangle(tri) => world_paths(&Geometry::Polygon(tri.to_polygon())),
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(world_paths).collect(),
    }
}
