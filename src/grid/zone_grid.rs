use crate::coord::{Coordinate, Crs, ProjectionConstants, to_meters};
use crate::error::GeohexError;
use crate::grid::extent::{zones_around, zones_in_extent_with};
use crate::index::meters_to_axial;
use crate::zone::Zone;
use geo_types::{Polygon, Rect};
use std::collections::HashSet;

/// A deduplicated collection of zones of one level.
#[derive(Debug, Clone)]
pub struct ZoneGrid {
    zones: Vec<Zone>,
    level: u8,
    constants: ProjectionConstants,
}

impl ZoneGrid {
    pub fn builder() -> ZoneGridBuilder {
        ZoneGridBuilder::new()
    }

    /// Zones covering a lon/lat bounding box.
    pub fn from_extent(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        level: u8,
    ) -> Result<Self, GeohexError> {
        Self::builder()
            .level(level)
            .extent(min_x, min_y, max_x, max_y)
            .build()
    }

    pub fn from_rect(rect: &Rect<f64>, level: u8) -> Result<Self, GeohexError> {
        Self::builder().level(level).rect(rect).build()
    }

    /// `center` and all zones within `distance` steps of it.
    pub fn around(center: &Zone, distance: u32) -> Result<Self, GeohexError> {
        Ok(Self {
            zones: zones_around(center, distance)?,
            level: center.level(),
            constants: *center.constants(),
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn into_zones(self) -> Vec<Zone> {
        self.zones
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// The zone of this grid containing a lon/lat point, if any.
    pub fn get_zone_at(&self, coord: &impl Coordinate) -> Option<&Zone> {
        let meters = to_meters(coord.x(), coord.y(), &self.constants).ok()?;
        let (x, y) = meters_to_axial(&meters, self.level, &self.constants).ok()?;
        self.zones.iter().find(|zone| zone.x() == x && zone.y() == y)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.zones.iter().any(|zone| zone.code() == code)
    }

    pub fn to_polygons(&self, crs: Crs) -> Vec<Polygon<f64>> {
        self.zones.iter().map(|zone| zone.to_polygon_in(crs)).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&Zone>
    where
        F: Fn(&Zone) -> bool,
    {
        self.zones.iter().filter(|zone| predicate(zone)).collect()
    }
}

impl<'a> IntoIterator for &'a ZoneGrid {
    type Item = &'a Zone;
    type IntoIter = std::slice::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}

#[derive(Debug, Clone, Copy)]
enum Area {
    Extent {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
    Around {
        lon: f64,
        lat: f64,
        distance: u32,
    },
}

/// Builder for [`ZoneGrid`].
///
/// # Example
/// ```
/// use geohex_rs::ZoneGrid;
///
/// # fn main() -> Result<(), geohex_rs::GeohexError> {
/// let grid = ZoneGrid::builder()
///     .level(5)
///     .extent(139.5, 35.5, 139.8, 35.8)
///     .build()?;
/// assert!(grid.get_zone_at(&(139.65, 35.65)).is_some());
///
/// let ring = ZoneGrid::builder()
///     .level(7)
///     .center(139.766084, 35.681382)
///     .distance(2)
///     .build()?;
/// assert_eq!(ring.len(), 19);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ZoneGridBuilder {
    level: Option<u8>,
    area: Option<Area>,
    distance: u32,
    constants: Option<ProjectionConstants>,
}

impl ZoneGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Lon/lat bounding box to tile.
    pub fn extent(mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        self.area = Some(Area::Extent {
            min_x,
            min_y,
            max_x,
            max_y,
        });
        self
    }

    pub fn rect(self, rect: &Rect<f64>) -> Self {
        self.extent(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// Lon/lat point whose zone and surroundings make up the grid.
    pub fn center(mut self, lon: f64, lat: f64) -> Self {
        self.area = Some(Area::Around {
            lon,
            lat,
            distance: self.distance,
        });
        self
    }

    /// Steps around the center to include. Ignored for extents.
    pub fn distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        if let Some(Area::Around { distance: d, .. }) = self.area.as_mut() {
            *d = distance;
        }
        self
    }

    pub fn constants(mut self, constants: ProjectionConstants) -> Self {
        self.constants = Some(constants);
        self
    }

    pub fn build(self) -> Result<ZoneGrid, GeohexError> {
        let level = self
            .level
            .ok_or_else(|| GeohexError::invalid("level must be set"))?;
        let area = self
            .area
            .ok_or_else(|| GeohexError::invalid("an extent or a center must be set"))?;
        let constants = self.constants.unwrap_or_default();

        let zones = match area {
            Area::Extent {
                min_x,
                min_y,
                max_x,
                max_y,
            } => zones_in_extent_with(level, min_x, min_y, max_x, max_y, &constants)?,
            Area::Around { lon, lat, distance } => {
                let center = Zone::from_wgs84_with(&(lon, lat), level, &constants)?;
                zones_around(&center, distance)?
            }
        };

        let mut seen = HashSet::with_capacity(zones.len());
        let zones = zones
            .into_iter()
            .filter(|zone| seen.insert(zone.code().to_string()))
            .collect();

        Ok(ZoneGrid {
            zones,
            level,
            constants,
        })
    }
}
