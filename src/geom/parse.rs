use crate::coord::Crs;
use crate::error::GeohexError;
use geo::CoordsIter;
use geo_types::Geometry;
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

const SNIPPET_LEN: usize = 40;

/// Builds a parse error quoting the start of the offending input.
fn parse_error(input: &str, reason: impl std::fmt::Display) -> GeohexError {
    let snippet: String = input.chars().take(SNIPPET_LEN).collect();
    let ellipsis = if input.chars().count() > SNIPPET_LEN { "..." } else { "" };
    GeohexError::GeometryParseError(format!("'{}{}': {}", snippet, ellipsis, reason))
}

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, GeohexError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(GeohexError::GeometryParseError("empty geometry".to_string()));
    }
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// [`parse_geometry`], then checks every coordinate can be placed on the grid.
///
/// Coordinates must be finite. In [`Crs::Wgs84`] longitudes must lie in
/// `[-180, 180]` and latitudes strictly between the poles, where the
/// projection is defined.
pub fn parse_geometry_in(s: &str, crs: Crs) -> Result<Geometry<f64>, GeohexError> {
    let geom = parse_geometry(s)?;
    for c in geom.coords_iter() {
        if !(c.x.is_finite() && c.y.is_finite()) {
            return Err(parse_error(s.trim(), format!("non-finite coordinate ({}, {})", c.x, c.y)));
        }
        if crs == Crs::Wgs84 && (c.x.abs() > 180.0 || c.y.abs() >= 90.0) {
            return Err(parse_error(
                s.trim(),
                format!("({}, {}) is not a projectable lon/lat", c.x, c.y),
            ));
        }
    }
    Ok(geom)
}

/// Parses a GeoJSON geometry or feature into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, GeohexError> {
    let geojson: GeoJson = s.parse().map_err(|e: geojson::Error| parse_error(s, e))?;

    let geom = match geojson {
        GeoJson::Geometry(geom) => geom,
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| parse_error(s, "feature has no geometry"))?,
        GeoJson::FeatureCollection(_) => {
            return Err(parse_error(
                s,
                "a FeatureCollection maps to many zones, pass its features one by one",
            ));
        }
    };
    Geometry::try_from(geom).map_err(|e| parse_error(s, e))
}

pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, GeohexError> {
    let wkt: Wkt<f64> = Wkt::from_str(s).map_err(|e| parse_error(s, e))?;
    wkt.try_into()
        .map_err(|_| parse_error(s, "WKT type has no geometry counterpart"))
}
