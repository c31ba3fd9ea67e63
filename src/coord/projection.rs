use crate::coord::Coordinate;
use crate::error::GeohexError;
use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Half the projected circumference of the canonical model, in meters.
const HALF_EQUATOR: f64 = 20037508.34;

/// Side length of a level-0 hex for the canonical model (`HALF_EQUATOR / 27 * 2`).
const BASE_HEX_SIDE: f64 = 1484259.877037037;

/// The two numbers the projection and grid are built on.
///
/// They always travel as a pair: a grid built with one `half_equator` and the
/// `base_hex_side` of another is not a GeoHex grid.
///
/// # Example
///
/// ```
/// use geohex_rs::ProjectionConstants;
///
/// let canonical = ProjectionConstants::default();
/// assert_eq!(canonical.half_equator(), 20037508.34);
///
/// let derived = ProjectionConstants::from_half_equator(20037408.34).unwrap();
/// assert!((derived.base_hex_side() - 20037408.34 / 27.0 * 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConstants")]
pub struct ProjectionConstants {
    half_equator: f64,
    base_hex_side: f64,
}

#[derive(Deserialize)]
struct RawConstants {
    half_equator: f64,
    base_hex_side: f64,
}

impl TryFrom<RawConstants> for ProjectionConstants {
    type Error = GeohexError;

    fn try_from(raw: RawConstants) -> Result<Self, Self::Error> {
        Self::new(raw.half_equator, raw.base_hex_side)
    }
}

impl Default for ProjectionConstants {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl ProjectionConstants {
    /// The constant pair every default constructor in this crate uses.
    pub const CANONICAL: ProjectionConstants = ProjectionConstants {
        half_equator: HALF_EQUATOR,
        base_hex_side: BASE_HEX_SIDE,
    };

    /// Builds a pair from explicit values. Both must be finite and positive.
    pub fn new(half_equator: f64, base_hex_side: f64) -> Result<Self, GeohexError> {
        if !(half_equator.is_finite() && half_equator > 0.0) {
            return Err(GeohexError::invalid(format!(
                "half_equator must be finite and positive, got {}",
                half_equator
            )));
        }
        if !(base_hex_side.is_finite() && base_hex_side > 0.0) {
            return Err(GeohexError::invalid(format!(
                "base_hex_side must be finite and positive, got {}",
                base_hex_side
            )));
        }
        Ok(Self {
            half_equator,
            base_hex_side,
        })
    }

    /// Builds a consistent pair by deriving the level-0 hex side from the half equator.
    pub fn from_half_equator(half_equator: f64) -> Result<Self, GeohexError> {
        Self::new(half_equator, half_equator / 27.0 * 2.0)
    }

    pub fn half_equator(&self) -> f64 {
        self.half_equator
    }

    pub fn base_hex_side(&self) -> f64 {
        self.base_hex_side
    }

    /// Unchecked forward projection; non-finite input gives non-finite output.
    pub fn project(&self, lon: f64, lat: f64) -> Point<f64> {
        let x = lon * self.half_equator / 180.0;
        let mut y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() / (PI / 180.0);
        y *= self.half_equator / 180.0;
        Point::new(x, y)
    }

    /// Unchecked inverse projection.
    pub fn unproject(&self, x: f64, y: f64) -> Point<f64> {
        let lon = (x / self.half_equator) * 180.0;
        let lat =
            (2.0 * (y / self.half_equator * 180.0).to_radians().exp().atan() - PI / 2.0).to_degrees();
        Point::new(lon, lat)
    }
}

fn check_finite(a: f64, b: f64, what: &str) -> Result<(), GeohexError> {
    if a.is_finite() && b.is_finite() {
        Ok(())
    } else {
        Err(GeohexError::invalid(format!(
            "{} must be finite, got ({}, {})",
            what, a, b
        )))
    }
}

/// Projects longitude/latitude degrees to planar meters.
///
/// Latitudes that do not project to a finite point (beyond the poles) are rejected.
pub fn to_meters(
    lon: f64,
    lat: f64,
    constants: &ProjectionConstants,
) -> Result<Point<f64>, GeohexError> {
    check_finite(lon, lat, "lon/lat")?;
    let p = constants.project(lon, lat);
    check_finite(p.x(), p.y(), "projected point")?;
    Ok(p)
}

/// Inverse of [`to_meters`]: planar meters back to longitude/latitude degrees.
pub fn to_degrees(
    x: f64,
    y: f64,
    constants: &ProjectionConstants,
) -> Result<Point<f64>, GeohexError> {
    check_finite(x, y, "x/y")?;
    Ok(constants.unproject(x, y))
}

/// [`to_meters`] for anything implementing [`Coordinate`].
pub fn wgs84_to_meters<C: Coordinate>(
    coord: &C,
    constants: &ProjectionConstants,
) -> Result<Point<f64>, GeohexError> {
    to_meters(coord.x(), coord.y(), constants)
}

/// [`to_degrees`] for anything implementing [`Coordinate`].
pub fn meters_to_wgs84<C: Coordinate>(
    coord: &C,
    constants: &ProjectionConstants,
) -> Result<Point<f64>, GeohexError> {
    to_degrees(coord.x(), coord.y(), constants)
}
