mod projection;

pub use projection::{ProjectionConstants, meters_to_wgs84, to_degrees, to_meters, wgs84_to_meters};

use geo_types::Point;

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples and `geo_types::Point<f64>`.
/// This allows functions to accept either type.
pub trait Coordinate {
    /// Returns the x-coordinate (projected x or longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (projected y or latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

/// Coordinate reference system for input coordinates and exported geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crs {
    /// WGS84 (EPSG:4326) - longitude/latitude degrees
    #[default]
    Wgs84,
    /// Pseudo-Mercator (EPSG:3857) - projected meters
    Mercator,
}

impl Crs {
    /// Authority code written into exported geometry metadata.
    pub fn authority_code(&self) -> &'static str {
        match self {
            Crs::Wgs84 => "EPSG:4326",
            Crs::Mercator => "EPSG:3857",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (139.76, 35.68);
        assert_eq!(tuple.x(), 139.76);
        assert_eq!(tuple.y(), 35.68);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(139.76, 35.68);
        assert_eq!(point.x(), 139.76);
        assert_eq!(point.y(), 35.68);
    }

    #[test]
    fn test_crs_authority_code() {
        assert_eq!(Crs::default(), Crs::Wgs84);
        assert_eq!(Crs::Mercator.authority_code(), "EPSG:3857");
    }
}
