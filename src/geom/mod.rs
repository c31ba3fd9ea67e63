mod hexagon;
mod parse;

pub use hexagon::{hexagon_polygon, hexagon_vertices, polygon_wkt};
pub use parse::{parse_geojson, parse_geometry, parse_geometry_in, parse_wkt};
