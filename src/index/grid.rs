use crate::coord::{Coordinate, ProjectionConstants, to_degrees, to_meters};
use crate::error::GeohexError;
use crate::index::constants::MAX_LEVEL;
use geo_types::Point;

const SQRT_3: f64 = 1.7320508075688772;

/// Returns an error if `level` is beyond [`MAX_LEVEL`].
pub fn check_level(level: u8) -> Result<(), GeohexError> {
    if level > MAX_LEVEL {
        return Err(GeohexError::invalid(format!(
            "level {} is above the maximum of {}",
            level, MAX_LEVEL
        )));
    }
    Ok(())
}

/// Side length in meters of a cell at `level`.
pub fn cell_side(level: u8, constants: &ProjectionConstants) -> f64 {
    constants.base_hex_side() / 3.0_f64.powi(level as i32)
}

/// Largest absolute axial coordinate a code of `level` can carry.
pub(crate) fn axial_limit(level: u8) -> i64 {
    (3_i64.pow(level as u32 + 3) - 1) / 2
}

/// Converts a projected point to the axial coordinates of the cell containing it.
///
/// The point is rotated into the skewed lattice basis and each axis rounded
/// independently. Rounding alone picks the nearest rhombus corner, so the
/// fractional point is then re-tested against the two triangles of the
/// enclosing rhombus that belong to its upper and lower corner cells.
///
/// # Example
///
/// ```
/// use geohex_rs::{ProjectionConstants, meters_to_axial, to_meters};
///
/// # fn main() -> Result<(), geohex_rs::GeohexError> {
/// let constants = ProjectionConstants::default();
/// let tokyo = to_meters(139.766084, 35.681382, &constants)?;
/// assert_eq!(meters_to_axial(&tokyo, 4, &constants)?, (417, -149));
/// # Ok(())
/// # }
/// ```
pub fn meters_to_axial<C: Coordinate>(
    coord: &C,
    level: u8,
    constants: &ProjectionConstants,
) -> Result<(i64, i64), GeohexError> {
    check_level(level)?;
    let (x, y) = (coord.x(), coord.y());
    if !(x.is_finite() && y.is_finite()) {
        return Err(GeohexError::invalid(format!(
            "x/y must be finite, got ({}, {})",
            x, y
        )));
    }

    let side = cell_side(level, constants);
    let lattice = side * SQRT_3;

    let hy = y - (1.0 / SQRT_3) * x;
    let hx = y + (1.0 / SQRT_3) * x;
    let fx = hx / lattice;
    let fy = hy / lattice;

    let limit = axial_limit(level) as f64;
    if fx.abs() > limit + 1.0 || fy.abs() > limit + 1.0 {
        return Err(GeohexError::invalid(format!(
            "point ({}, {}) is outside the level {} grid",
            x, y, level
        )));
    }

    let fx0 = fx.floor();
    let fy0 = fy.floor();
    // Exact halves go to the even neighbor.
    let mut rx = fx.round_ties_even();
    let mut ry = fy.round_ties_even();

    if fy >= -fx + fx0 + fy0 + 1.0 {
        // upper triangle of the rhombus
        if 0.5 * fx - 0.5 * fx0 + fy0 < fy && fy < 2.0 * fx - 2.0 * fx0 + fy0 {
            rx = fx0 + 1.0;
            ry = fy0 + 1.0;
        }
    } else if 2.0 * fx - 2.0 * fx0 + fy0 - 1.0 < fy && fy < 0.5 * fx - 0.5 * fx0 + fy0 + 0.5 {
        rx = fx0;
        ry = fy0;
    }

    // The lattice orientation flips at the antimeridian.
    let center_x = (rx * lattice - ry * lattice) * (SQRT_3 / 2.0);
    if constants.half_equator() - center_x < side / 2.0 {
        std::mem::swap(&mut rx, &mut ry);
    }

    Ok((rx as i64, ry as i64))
}

/// Converts axial coordinates to the projected center of the cell.
pub fn axial_to_meters(
    x: i64,
    y: i64,
    level: u8,
    constants: &ProjectionConstants,
) -> Result<Point<f64>, GeohexError> {
    check_level(level)?;

    let side = cell_side(level, constants);
    let my = (x as f64 + y as f64) * side * SQRT_3 / 2.0;
    let mx = (x as f64 - y as f64) * side * 3.0 / 2.0;

    Ok(Point::new(mx, my))
}

/// Converts longitude/latitude to the axial coordinates of the containing cell.
pub fn wgs84_to_axial(
    lon: f64,
    lat: f64,
    level: u8,
    constants: &ProjectionConstants,
) -> Result<(i64, i64), GeohexError> {
    let meters = to_meters(lon, lat, constants)?;
    meters_to_axial(&meters, level, constants)
}

/// Converts axial coordinates to the longitude/latitude of the cell center.
pub fn axial_to_wgs84(
    x: i64,
    y: i64,
    level: u8,
    constants: &ProjectionConstants,
) -> Result<Point<f64>, GeohexError> {
    let meters = axial_to_meters(x, y, level, constants)?;
    to_degrees(meters.x(), meters.y(), constants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    const C: ProjectionConstants = ProjectionConstants::CANONICAL;

    #[test]
    fn test_tokyo_station_level_4() -> Result<(), GeohexError> {
        assert_eq!(wgs84_to_axial(139.766084, 35.681382, 4, &C)?, (417, -149));
        Ok(())
    }

    #[test]
    fn test_known_points() -> Result<(), GeohexError> {
        assert_eq!(wgs84_to_axial(0.0, 0.0, 0, &C)?, (0, 0));
        assert_eq!(wgs84_to_axial(-74.0, 40.7, 1, &C)?, (0, 11));
        assert_eq!(wgs84_to_axial(2.35, 48.85, 10, &C)?, (147013, 140075));
        assert_eq!(wgs84_to_axial(151.2, -33.86, 7, &C)?, (4856, -11678));
        assert_eq!(
            wgs84_to_axial(139.766084, 35.681382, 15, &C)?,
            (73896826, -26377701)
        );
        Ok(())
    }

    #[test]
    fn test_half_way_points_round_to_even() -> Result<(), GeohexError> {
        for &((x, y), expected) in &[
            ((1113194.9077777774, 642703.3796660205), (0, 0)),
            ((-1113194.9077777774, -642703.3796660205), (0, 0)),
            ((5565974.5388888875, 3213516.8983301027), (2, 0)),
            ((-5565974.5388888875, 3213516.8983301027), (0, 2)),
        ] {
            assert_eq!(meters_to_axial(&(x, y), 0, &C)?, expected, "({}, {})", x, y);
        }
        Ok(())
    }

    #[test]
    fn test_antimeridian_swaps_axes() -> Result<(), GeohexError> {
        assert_eq!(wgs84_to_axial(179.99, 0.0, 2, &C)?, (-40, 41));
        assert_eq!(wgs84_to_axial(-179.99, 0.0, 2, &C)?, (-40, 41));
        assert_eq!(wgs84_to_axial(179.9, 10.0, 3, &C)?, (-110, 133));
        Ok(())
    }

    #[test]
    fn test_custom_constants() -> Result<(), GeohexError> {
        // A consistent pair scales meters and cells together.
        let legacy = ProjectionConstants::from_half_equator(20037408.34)?;
        assert_eq!(wgs84_to_axial(139.766084, 35.681382, 4, &legacy)?, (417, -149));
        assert_eq!(wgs84_to_axial(179.99, 0.0, 2, &legacy)?, (-40, 41));

        let canonical = axial_to_meters(417, -149, 4, &C)?;
        let scaled = axial_to_meters(417, -149, 4, &legacy)?;
        assert!(scaled.x() < canonical.x());

        // Tripling the base side makes level n line up with canonical level n - 1.
        let coarse = ProjectionConstants::new(C.half_equator(), C.base_hex_side() * 3.0)?;
        let tokyo = to_meters(139.766084, 35.681382, &C)?;
        assert_eq!(
            meters_to_axial(&tokyo, 5, &coarse)?,
            meters_to_axial(&tokyo, 4, &C)?
        );
        Ok(())
    }

    #[test]
    fn test_axial_to_meters_known_center() -> Result<(), GeohexError> {
        let center = axial_to_meters(417, -149, 4, &C)?;
        assert!((center.x() - 15557242.414869685).abs() < 1e-6);
        assert!((center.y() - 4252950.759271444).abs() < 1e-6);

        let deg = axial_to_wgs84(417, -149, 4, &C)?;
        assert!((deg.x() - 139.7530864197531).abs() < 1e-9);
        assert!((deg.y() - 35.65279272518613).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_center_maps_to_itself() -> Result<(), GeohexError> {
        for level in [0_u8, 3, 7, 12] {
            for &(x, y) in &[(0, 0), (5, -3), (-2, 4), (3, 2), (-4, -5)] {
                let center = axial_to_meters(x, y, level, &C)?;
                assert_eq!(meters_to_axial(&center, level, &C)?, (x, y));
            }
        }
        Ok(())
    }

    #[test]
    fn test_near_center_same_cell() -> Result<(), GeohexError> {
        let center = axial_to_meters(417, -149, 4, &C)?;
        let side = cell_side(4, &C);
        for (dx, dy) in [(0.4, 0.0), (-0.4, 0.0), (0.0, 0.4), (0.0, -0.4), (0.3, 0.3)] {
            let pt = point! { x: center.x() + dx * side, y: center.y() + dy * side };
            assert_eq!(meters_to_axial(&pt, 4, &C)?, (417, -149));
        }
        Ok(())
    }

    #[test]
    fn test_cell_side_divides_by_three() {
        assert_eq!(cell_side(0, &C), C.base_hex_side());
        assert!((cell_side(2, &C) * 9.0 - C.base_hex_side()).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_level() {
        let result = meters_to_axial(&(0.0, 0.0), 30, &C);
        assert!(matches!(result, Err(GeohexError::InvalidArgument(_))));
        assert!(axial_to_meters(0, 0, MAX_LEVEL + 1, &C).is_err());
    }

    #[test]
    fn test_non_finite_point() {
        let result = meters_to_axial(&(f64::NAN, 0.0), 3, &C);
        assert!(matches!(result, Err(GeohexError::InvalidArgument(_))));
    }
}
