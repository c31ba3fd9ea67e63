//! # geohex-rs
//!
//! A hierarchical hexagonal grid over pseudo-Mercator meters. Every cell has
//! a short code such as `XM4885` that carries its level and position, and
//! each level splits a cell into nine children a third of its size.
//!
//! ### 1. `Zone` - Single Cell Operations
//!
//! ```
//! use geohex_rs::Zone;
//!
//! # fn main() -> Result<(), geohex_rs::GeohexError> {
//! let zone = Zone::from_wgs84(&(139.766084, 35.681382), 4)?;
//! assert_eq!(zone.code(), "XM4885");
//! assert_eq!((zone.x(), zone.y()), (417, -149));
//!
//! let parent = zone.parent()?;
//! assert_eq!(parent.code(), "XM488");
//!
//! let same = Zone::from_code("XM4885")?;
//! assert_eq!(zone, same);
//! println!("{}", zone.wkt_deg());
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `ZoneGrid` - Collections of Zones
//!
//! ```
//! use geohex_rs::ZoneGrid;
//!
//! # fn main() -> Result<(), geohex_rs::GeohexError> {
//! let grid = ZoneGrid::builder()
//!     .level(3)
//!     .extent(139.0, 35.0, 140.0, 36.0)
//!     .build()?;
//! assert_eq!(grid.len(), 6);
//!
//! if let Some(zone) = grid.get_zone_at(&(139.5, 35.5)) {
//!     println!("{}", zone.code());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. The codec
//!
//! ```
//! use geohex_rs::{decode, encode};
//!
//! # fn main() -> Result<(), geohex_rs::GeohexError> {
//! assert_eq!(encode(7, -1632, 9851)?, "RU6063103");
//! assert_eq!(decode("RU6063103")?, (7, -1632, 9851));
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. Export
//!
//! ```no_run
//! use geohex_rs::{Crs, ZonesToGeoParquet, write_zones_csv, zones_in_extent};
//!
//! # fn main() -> Result<(), geohex_rs::GeohexError> {
//! let zones = zones_in_extent(5, 139.5, 35.5, 139.8, 35.8)?;
//! zones.to_geoparquet("tokyo.parquet", Crs::Wgs84)?;
//! write_zones_csv(&zones, "tokyo.csv", Crs::Mercator)?;
//! # Ok(())
//! # }
//! ```
//!

pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;
pub mod zone;

pub use coord::{
    Coordinate, Crs, ProjectionConstants, meters_to_wgs84, to_degrees, to_meters, wgs84_to_meters,
};
pub use error::GeohexError;
pub use geom::{parse_geojson, parse_geometry, parse_geometry_in, parse_wkt};
pub use grid::{ZoneGrid, ZoneGridBuilder, zones_around, zones_in_extent, zones_in_extent_with};
pub use index::{
    CHILDREN_PER_ZONE, HEX_KEY, MAX_LEVEL, axial_to_meters, axial_to_wgs84, cell_side, decode,
    encode, meters_to_axial, wgs84_to_axial,
};
pub use io::{
    CoordinateSource, CsvToZones, CsvZoneConfig, GeometryFormat, ZonesToArrow, ZonesToGeoParquet,
    csv_to_zone_csv, write_geoparquet, write_zones_csv,
};
pub use zone::Zone;

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;
