use crate::coord::{Coordinate, Crs, ProjectionConstants, to_meters};
use crate::error::GeohexError;
use crate::geom::{hexagon_polygon, hexagon_vertices, polygon_wkt};
use crate::index::{
    CHILDREN_PER_ZONE, MAX_LEVEL, axial_limit, axial_to_meters, cell_side, decode, encode,
    meters_to_axial,
};
use geo::Centroid;
use geo_types::{Coord, Geometry, LineString, Point, Polygon};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A single hexagonal cell of the GeoHex grid.
///
/// A `Zone` is an immutable value: its code, axial position and center are
/// fixed at construction, and every topology operation returns new zones.
/// Equality and hashing use the code alone, so two zones built from
/// different inputs (a point, a code, axial coordinates) are interchangeable
/// whenever their codes match.
///
/// # Example
///
/// ```
/// use geohex_rs::Zone;
///
/// # fn main() -> Result<(), geohex_rs::GeohexError> {
/// let zone = Zone::from_wgs84(&(139.766084, 35.681382), 4)?;
/// assert_eq!(zone.code(), "XM4885");
/// assert_eq!((zone.x(), zone.y()), (417, -149));
///
/// let same = Zone::from_code("XM4885")?;
/// assert_eq!(zone, same);
///
/// // Corners of the hexagon as a WKT polygon in degrees
/// println!("{}", zone.wkt_deg());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Zone {
    code: String,
    level: u8,
    x: i64,
    y: i64,
    center: Point<f64>,
    center_deg: Point<f64>,
    constants: ProjectionConstants,
}

impl Zone {
    /// Create a Zone from axial coordinates at `level`.
    pub fn from_axial(level: u8, x: i64, y: i64) -> Result<Self, GeohexError> {
        Self::from_axial_with(level, x, y, &ProjectionConstants::default())
    }

    /// [`Zone::from_axial`] on a grid built from explicit projection constants.
    pub fn from_axial_with(
        level: u8,
        x: i64,
        y: i64,
        constants: &ProjectionConstants,
    ) -> Result<Self, GeohexError> {
        let code = encode(level, x, y)?;
        let center = axial_to_meters(x, y, level, constants)?;
        let center_deg = constants.unproject(center.x(), center.y());

        Ok(Self {
            code,
            level,
            x,
            y,
            center,
            center_deg,
            constants: *constants,
        })
    }

    /// Create a Zone from its code.
    ///
    /// # Example
    /// ```
    /// use geohex_rs::Zone;
    ///
    /// # fn main() -> Result<(), geohex_rs::GeohexError> {
    /// let zone = Zone::from_code("RU6063103")?;
    /// assert_eq!(zone.level(), 7);
    /// assert_eq!((zone.x(), zone.y()), (-1632, 9851));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_code(code: &str) -> Result<Self, GeohexError> {
        Self::from_code_with(code, &ProjectionConstants::default())
    }

    pub fn from_code_with(code: &str, constants: &ProjectionConstants) -> Result<Self, GeohexError> {
        let (level, x, y) = decode(code)?;
        Self::from_axial_with(level, x, y, constants)
    }

    /// Create a Zone from WGS84 (lon/lat) coordinates.
    ///
    /// # Example
    /// ```
    /// use geohex_rs::Zone;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), geohex_rs::GeohexError> {
    /// // From tuple
    /// let zone = Zone::from_wgs84(&(139.766084, 35.681382), 7)?;
    /// // From Point
    /// let zone = Zone::from_wgs84(&Point::new(139.766084, 35.681382), 7)?;
    /// println!("Code: {}", zone.code());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate, level: u8) -> Result<Self, GeohexError> {
        Self::from_wgs84_with(coord, level, &ProjectionConstants::default())
    }

    pub fn from_wgs84_with(
        coord: &impl Coordinate,
        level: u8,
        constants: &ProjectionConstants,
    ) -> Result<Self, GeohexError> {
        let meters = to_meters(coord.x(), coord.y(), constants)?;
        Self::from_meters_with(&meters, level, constants)
    }

    /// Create a Zone from projected (pseudo-Mercator) meters.
    pub fn from_meters(coord: &impl Coordinate, level: u8) -> Result<Self, GeohexError> {
        Self::from_meters_with(coord, level, &ProjectionConstants::default())
    }

    pub fn from_meters_with(
        coord: &impl Coordinate,
        level: u8,
        constants: &ProjectionConstants,
    ) -> Result<Self, GeohexError> {
        let (x, y) = meters_to_axial(coord, level, constants)?;
        Self::from_axial_with(level, x, y, constants)
    }

    fn from_point_in(
        coord: &impl Coordinate,
        level: u8,
        crs: Crs,
        constants: &ProjectionConstants,
    ) -> Result<Self, GeohexError> {
        match crs {
            Crs::Wgs84 => Self::from_wgs84_with(coord, level, constants),
            Crs::Mercator => Self::from_meters_with(coord, level, constants),
        }
    }

    /// Create Zones along a LineString.
    ///
    /// Samples the line in projected meters every half cell side and returns
    /// each zone it passes through once, in the order first reached.
    pub fn from_line_string(
        line: &LineString,
        level: u8,
        crs: Crs,
    ) -> Result<Vec<Self>, GeohexError> {
        Self::from_line_string_with(line, level, crs, &ProjectionConstants::default())
    }

    pub fn from_line_string_with(
        line: &LineString,
        level: u8,
        crs: Crs,
        constants: &ProjectionConstants,
    ) -> Result<Vec<Self>, GeohexError> {
        let step_size = cell_side(level, constants) * 0.5;

        let coords: Vec<Coord<f64>> = match crs {
            Crs::Mercator => line.0.clone(),
            Crs::Wgs84 => line
                .0
                .iter()
                .map(|c| to_meters(c.x, c.y, constants).map(Coord::from))
                .collect::<Result<_, _>>()?,
        };

        let mut seen: HashSet<(i64, i64)> = HashSet::new();
        let mut zones: Vec<Zone> = Vec::new();

        let mut visit = |x: f64, y: f64| -> Result<(), GeohexError> {
            let (ax, ay) = meters_to_axial(&(x, y), level, constants)?;
            if seen.insert((ax, ay)) {
                zones.push(Zone::from_axial_with(level, ax, ay, constants)?);
            }
            Ok(())
        };

        if let [only] = coords.as_slice() {
            visit(only.x, only.y)?;
        }

        for window in coords.windows(2) {
            let start = &window[0];
            let end = &window[1];

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            let steps = (segment_length / step_size).ceil() as usize;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                visit(start.x + t * dx, start.y + t * dy)?;
            }
        }

        Ok(zones)
    }

    /// Create Zones from an arbitrary `geo_types::Geometry`.
    ///
    /// Points map to their zone, lines to the zones they cross, and polygons
    /// to the zone of their centroid. Collections are flattened.
    pub fn from_geometry(geom: Geometry<f64>, level: u8, crs: Crs) -> Result<Vec<Self>, GeohexError> {
        Self::from_geometry_with(geom, level, crs, &ProjectionConstants::default())
    }

    pub fn from_geometry_with(
        geom: Geometry<f64>,
        level: u8,
        crs: Crs,
        constants: &ProjectionConstants,
    ) -> Result<Vec<Self>, GeohexError> {
        match geom {
            Geometry::Point(pt) => Ok(vec![Self::from_point_in(&pt, level, crs, constants)?]),
            Geometry::MultiPoint(mp) => mp
                .0
                .iter()
                .map(|pt| Self::from_point_in(pt, level, crs, constants))
                .collect(),
            Geometry::LineString(line) => Self::from_line_string_with(&line, level, crs, constants),
            Geometry::MultiLineString(mls) => {
                let mut all = Vec::new();
                for line in &mls.0 {
                    all.extend(Self::from_line_string_with(line, level, crs, constants)?);
                }
                Ok(all)
            }
            Geometry::Polygon(poly) => match poly.centroid() {
                Some(centroid) => Ok(vec![Self::from_point_in(&centroid, level, crs, constants)?]),
                None => Ok(vec![]),
            },
            Geometry::MultiPolygon(mp) => {
                let mut zones = Vec::new();
                for poly in &mp.0 {
                    if let Some(centroid) = poly.centroid() {
                        zones.push(Self::from_point_in(&centroid, level, crs, constants)?);
                    }
                }
                Ok(zones)
            }
            Geometry::GeometryCollection(gc) => {
                let mut all = Vec::new();
                for g in gc.0 {
                    all.extend(Self::from_geometry_with(g, level, crs, constants)?);
                }
                Ok(all)
            }
            _ => Err(GeohexError::GeometryParseError(
                "Unsupported geometry type".to_string(),
            )),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Axial x coordinate.
    pub fn x(&self) -> i64 {
        self.x
    }

    /// Axial y coordinate.
    pub fn y(&self) -> i64 {
        self.y
    }

    /// Center of the cell in projected meters.
    pub fn center(&self) -> Point<f64> {
        self.center
    }

    /// Center of the cell in longitude/latitude degrees.
    pub fn center_deg(&self) -> Point<f64> {
        self.center_deg
    }

    pub fn lon(&self) -> f64 {
        self.center_deg.x()
    }

    pub fn lat(&self) -> f64 {
        self.center_deg.y()
    }

    pub fn constants(&self) -> &ProjectionConstants {
        &self.constants
    }

    /// Side length of this cell in projected meters.
    pub fn cell_side(&self) -> f64 {
        cell_side(self.level, &self.constants)
    }

    fn sibling(&self, dx: i64, dy: i64) -> Result<Zone, GeohexError> {
        Zone::from_axial_with(self.level, self.x + dx, self.y + dy, &self.constants)
    }

    /// The zone one level coarser that contains this one.
    pub fn parent(&self) -> Result<Zone, GeohexError> {
        if self.level == 0 {
            return Err(GeohexError::invalid("a level 0 zone has no parent"));
        }
        Zone::from_code_with(&self.code[..self.code.len() - 1], &self.constants)
    }

    /// The nine zones one level finer, ordered by their last code digit.
    pub fn children(&self) -> Result<Vec<Zone>, GeohexError> {
        if self.level >= MAX_LEVEL {
            return Err(GeohexError::invalid(format!(
                "a level {} zone has no children",
                MAX_LEVEL
            )));
        }
        let mut children = Vec::with_capacity(CHILDREN_PER_ZONE);
        for digit in '0'..='8' {
            let code = format!("{}{}", self.code, digit);
            children.push(Zone::from_code_with(&code, &self.constants)?);
        }
        Ok(children)
    }

    /// Number of steps between two zones of the same level.
    ///
    /// Moving along both axes at once (the lattice diagonal) costs one step,
    /// so same-sign offsets cost the larger component and mixed-sign offsets
    /// the sum of both.
    pub fn distance(&self, other: &Zone) -> Result<u64, GeohexError> {
        if self.level != other.level {
            return Err(GeohexError::LevelMismatch {
                left: self.level,
                right: other.level,
            });
        }
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let (ax, ay) = (dx.unsigned_abs(), dy.unsigned_abs());

        if dx.signum() * dy.signum() > 0 {
            Ok(ax.max(ay))
        } else {
            Ok(ax + ay)
        }
    }

    /// All zones within `distance` steps of this one, excluding itself.
    ///
    /// The result is the filled hexagonal disk of `3 * d * (d + 1)` zones.
    /// Its size grows quadratically with `distance`, which is caller-controlled.
    ///
    /// # Errors
    ///
    /// - [`GeohexError::InvalidArgument`] - the disk reaches past the edge of
    ///   the level's grid, or the result cannot be allocated
    pub fn movable_zones(&self, distance: u32) -> Result<Vec<Zone>, GeohexError> {
        let d = distance as i64;
        let limit = axial_limit(self.level);
        if self.x.abs() + d > limit || self.y.abs() + d > limit {
            return Err(GeohexError::invalid(format!(
                "distance {} from {} reaches past the level {} grid",
                distance, self.code, self.level
            )));
        }

        let count = (d as usize)
            .checked_add(1)
            .and_then(|n| n.checked_mul(d as usize))
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| GeohexError::invalid(format!("distance {} is too large", distance)))?;
        let mut zones = Vec::new();
        zones.try_reserve_exact(count).map_err(|e| {
            GeohexError::invalid(format!("{} zones at distance {}: {}", count, distance, e))
        })?;
        for dy in -d..=d {
            let min_dx = if dy > 0 { -d + dy } else { -d };
            let max_dx = if dy < 0 { d + dy } else { d };
            for dx in min_dx..=max_dx {
                if dx == 0 && dy == 0 {
                    continue;
                }
                zones.push(self.sibling(dx, dy)?);
            }
        }
        Ok(zones)
    }

    /// The six zones sharing an edge with this one.
    pub fn neighbors(&self) -> Result<Vec<Zone>, GeohexError> {
        self.movable_zones(1)
    }

    /// The 3x3 block of axial offsets `-1..=1` on both axes, this zone included.
    ///
    /// This is a block in axial space, not hex adjacency: two of the eight
    /// surrounding entries, `(-1, +1)` and `(+1, -1)`, are two steps away.
    /// Use [`Zone::neighbors`] for the cells that share an edge.
    pub fn adjacent_block(&self) -> Result<Vec<Zone>, GeohexError> {
        let mut zones = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                zones.push(self.sibling(dx, dy)?);
            }
        }
        Ok(zones)
    }

    /// Whether a projected point falls in this zone.
    pub fn contains_meters(&self, coord: &impl Coordinate) -> bool {
        matches!(
            meters_to_axial(coord, self.level, &self.constants),
            Ok((x, y)) if x == self.x && y == self.y
        )
    }

    /// The six corners in projected meters: left, upper-left, upper-right,
    /// right, lower-right, lower-left.
    pub fn vertices(&self) -> [Coord<f64>; 6] {
        hexagon_vertices(self.center.x(), self.center.y(), self.cell_side())
    }

    /// [`Zone::vertices`] projected to longitude/latitude degrees.
    pub fn vertices_deg(&self) -> [Coord<f64>; 6] {
        self.vertices()
            .map(|c| Coord::from(self.constants.unproject(c.x, c.y)))
    }

    /// Corners in the requested CRS.
    pub fn vertices_in(&self, crs: Crs) -> [Coord<f64>; 6] {
        match crs {
            Crs::Mercator => self.vertices(),
            Crs::Wgs84 => self.vertices_deg(),
        }
    }

    /// Closed hexagon polygon in projected meters.
    pub fn to_polygon(&self) -> Polygon<f64> {
        hexagon_polygon(&self.vertices())
    }

    /// Closed hexagon polygon in degrees.
    pub fn to_polygon_deg(&self) -> Polygon<f64> {
        hexagon_polygon(&self.vertices_deg())
    }

    pub fn to_polygon_in(&self, crs: Crs) -> Polygon<f64> {
        hexagon_polygon(&self.vertices_in(crs))
    }

    /// WKT polygon in projected meters.
    pub fn wkt(&self) -> String {
        polygon_wkt(&self.vertices())
    }

    /// WKT polygon in degrees.
    pub fn wkt_deg(&self) -> String {
        polygon_wkt(&self.vertices_deg())
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Zone {}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl FromStr for Zone {
    type Err = GeohexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::from_code(s)
    }
}
