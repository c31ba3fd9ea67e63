use geo_types::{Coord, LineString, Polygon};
use std::fmt::Write;

/// Returns the six corners of a flat-topped hexagon.
///
/// Order: left, upper-left, upper-right, right, lower-right, lower-left.
pub fn hexagon_vertices(center_x: f64, center_y: f64, side: f64) -> [Coord<f64>; 6] {
    let half = side / 2.0;
    let height = half * 3.0_f64.sqrt();

    let top = center_y + height;
    let bottom = center_y - height;

    [
        Coord { x: center_x - side, y: center_y },
        Coord { x: center_x - half, y: top },
        Coord { x: center_x + half, y: top },
        Coord { x: center_x + side, y: center_y },
        Coord { x: center_x + half, y: bottom },
        Coord { x: center_x - half, y: bottom },
    ]
}

/// Builds a closed polygon from a vertex ring.
pub fn hexagon_polygon(vertices: &[Coord<f64>]) -> Polygon<f64> {
    let mut coords = Vec::with_capacity(vertices.len() + 1);
    coords.extend_from_slice(vertices);
    if let Some(first) = vertices.first() {
        coords.push(*first);
    }
    Polygon::new(LineString::from(coords), vec![])
}

/// Formats a vertex ring as `POLYGON((x1 y1, ..., xn yn, x1 y1))`.
pub fn polygon_wkt(vertices: &[Coord<f64>]) -> String {
    let mut out = String::from("POLYGON((");
    for (i, c) in vertices.iter().chain(vertices.first()).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{} {}", c.x, c.y);
    }
    out.push_str("))");
    out
}
