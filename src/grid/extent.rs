use crate::coord::ProjectionConstants;
use crate::error::GeohexError;
use crate::zone::Zone;
use std::collections::HashSet;
use tracing::{debug, trace};

fn check_extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<(), GeohexError> {
    if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
        return Err(GeohexError::invalid(format!(
            "extent must be finite, got ({}, {}, {}, {})",
            min_x, min_y, max_x, max_y
        )));
    }
    if min_x >= max_x || min_y >= max_y {
        return Err(GeohexError::invalid(format!(
            "extent is empty or inverted: ({}, {}, {}, {})",
            min_x, min_y, max_x, max_y
        )));
    }
    Ok(())
}

/// Returns the zones at `level` covering a lon/lat bounding box.
///
/// See [`zones_in_extent_with`].
///
/// # Example
/// ```
/// use geohex_rs::zones_in_extent;
///
/// # fn main() -> Result<(), geohex_rs::GeohexError> {
/// let zones = zones_in_extent(3, 139.0, 35.0, 140.0, 36.0)?;
/// let codes: Vec<&str> = zones.iter().map(|z| z.code()).collect();
/// assert_eq!(codes, ["XM484", "XM485", "XM488", "XM563", "XM566", "XM800"]);
/// # Ok(())
/// # }
/// ```
pub fn zones_in_extent(
    level: u8,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
) -> Result<Vec<Zone>, GeohexError> {
    zones_in_extent_with(level, min_x, min_y, max_x, max_y, &ProjectionConstants::default())
}

/// Returns the zones at `level` covering a lon/lat bounding box, sorted by code.
///
/// The four corner zones span a parallelogram in the skewed lattice. It is
/// filled column by column along the lattice diagonal, then widened by one
/// partial row or column on each side whose corner zone stops short of the
/// box edge, and finally one zone diagonally outside each corner is removed.
/// The result over-covers near the corners. It is not an exact cut: a point
/// on a box edge far from the corners can still land in a zone left out.
///
/// Neither the antimeridian nor boxes spanning the globe are handled. The
/// number of zones grows with the box area at `level`.
pub fn zones_in_extent_with(
    level: u8,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    constants: &ProjectionConstants,
) -> Result<Vec<Zone>, GeohexError> {
    check_extent(min_x, min_y, max_x, max_y)?;

    let ll = Zone::from_wgs84_with(&(min_x, min_y), level, constants)?;
    let lr = Zone::from_wgs84_with(&(max_x, min_y), level, constants)?;
    let ul = Zone::from_wgs84_with(&(min_x, max_y), level, constants)?;
    let ur = Zone::from_wgs84_with(&(max_x, max_y), level, constants)?;

    let width = lr.distance(&ll)? as i64;
    let height = ul.distance(&ll)? as i64;
    debug!(level, width, height, ll = ll.code(), ur = ur.code(), "tiling extent");

    let at = |x: i64, y: i64| Zone::from_axial_with(level, x, y, constants);
    let mut result: HashSet<Zone> = HashSet::new();

    for i in 0..=width / 2 {
        let spine = at(ll.x() + i, ll.y() - i)?;
        for j in 0..=height {
            result.insert(at(spine.x() + j, spine.y() + j)?);
        }
        if spine != lr {
            let (sx, sy) = (spine.x() + 1, spine.y());
            for k in 0..height {
                result.insert(at(sx + k, sy + k)?);
            }
        }
    }

    if ll.vertices_deg()[0].y > min_y {
        trace!("extending bottom edge");
        for i in 0..=width / 2 {
            result.insert(at(ll.x() + i, ll.y() - 1 - i)?);
        }
    }
    if ul.vertices_deg()[0].y < max_y {
        trace!("extending top edge");
        for i in 0..=width / 2 {
            result.insert(at(ul.x() + 1 + i, ul.y() - i)?);
        }
    }
    if ll.vertices_deg()[1].x > min_x {
        trace!("extending left edge");
        for i in 0..height {
            result.insert(at(ll.x() + i, ll.y() + 1 + i)?);
        }
    }
    if lr.vertices_deg()[2].x < max_x {
        trace!("extending right edge");
        for i in 0..height {
            result.insert(at(lr.x() + 1 + i, lr.y() + i)?);
        }
    }

    for outside in [
        at(ll.x() - 1, ll.y())?,
        at(lr.x(), lr.y() - 1)?,
        at(ul.x(), ul.y() + 1)?,
        at(ur.x() + 1, ur.y())?,
    ] {
        result.remove(&outside);
    }

    let mut zones: Vec<Zone> = result.into_iter().collect();
    zones.sort_by(|a, b| a.code().cmp(b.code()));
    debug!(count = zones.len(), "extent tiled");
    Ok(zones)
}

/// Returns `center` followed by every zone within `distance` steps of it.
pub fn zones_around(center: &Zone, distance: u32) -> Result<Vec<Zone>, GeohexError> {
    let mut zones = vec![center.clone()];
    zones.extend(center.movable_zones(distance)?);
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(zones: &[Zone]) -> Vec<&str> {
        zones.iter().map(|z| z.code()).collect()
    }

    #[test]
    fn test_level_3_tokyo_box() -> Result<(), GeohexError> {
        let zones = zones_in_extent(3, 139.0, 35.0, 140.0, 36.0)?;
        assert_eq!(
            codes(&zones),
            ["XM484", "XM485", "XM488", "XM563", "XM566", "XM800"]
        );
        Ok(())
    }

    #[test]
    fn test_level_5_tokyo_box() -> Result<(), GeohexError> {
        let zones = zones_in_extent(5, 139.5, 35.5, 139.8, 35.8)?;
        assert_eq!(
            codes(&zones),
            [
                "XM48818", "XM48823", "XM48824", "XM48826", "XM48827", "XM48828", "XM48842",
                "XM48850", "XM48851", "XM48852", "XM48853", "XM48854", "XM48855", "XM48857",
                "XM48858", "XM56630", "XM56633", "XM56634", "XM56636", "XM56637", "XM56660",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_corners_covered() -> Result<(), GeohexError> {
        let (min_x, min_y, max_x, max_y) = (139.5, 35.5, 139.8, 35.8);
        let zones: HashSet<Zone> = zones_in_extent(5, min_x, min_y, max_x, max_y)?
            .into_iter()
            .collect();
        for corner in [(min_x, min_y), (max_x, min_y), (min_x, max_y), (max_x, max_y)] {
            assert!(zones.contains(&Zone::from_wgs84(&corner, 5)?));
        }
        Ok(())
    }

    #[test]
    fn test_interior_points_covered() -> Result<(), GeohexError> {
        let zones: HashSet<Zone> = zones_in_extent(5, 139.5, 35.5, 139.8, 35.8)?
            .into_iter()
            .collect();
        // Points on the box edge away from the corners may fall just outside.
        for i in 1..10 {
            for j in 1..10 {
                let lon = 139.5 + 0.3 * i as f64 / 10.0;
                let lat = 35.5 + 0.3 * j as f64 / 10.0;
                assert!(zones.contains(&Zone::from_wgs84(&(lon, lat), 5)?));
            }
        }
        Ok(())
    }

    #[test]
    fn test_level_3_box_fully_covered() -> Result<(), GeohexError> {
        let zones: HashSet<Zone> = zones_in_extent(3, 139.0, 35.0, 140.0, 36.0)?
            .into_iter()
            .collect();
        for i in 0..=10 {
            for j in 0..=10 {
                let pt = (139.0 + i as f64 / 10.0, 35.0 + j as f64 / 10.0);
                assert!(zones.contains(&Zone::from_wgs84(&pt, 3)?));
            }
        }
        Ok(())
    }

    #[test]
    fn test_invalid_extent() {
        assert!(matches!(
            zones_in_extent(3, 140.0, 35.0, 139.0, 36.0),
            Err(GeohexError::InvalidArgument(_))
        ));
        assert!(matches!(
            zones_in_extent(3, 139.0, 35.0, 139.0, 36.0),
            Err(GeohexError::InvalidArgument(_))
        ));
        assert!(zones_in_extent(3, f64::NAN, 35.0, 140.0, 36.0).is_err());
    }

    #[test]
    fn test_zones_around() -> Result<(), GeohexError> {
        let center = Zone::from_code("XM4885")?;
        let zones = zones_around(&center, 2)?;
        assert_eq!(zones.len(), 19);
        assert_eq!(zones[0], center);
        Ok(())
    }
}
