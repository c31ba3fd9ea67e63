pub mod arrow;
pub mod csv;
pub mod parquet;

pub use arrow::ZonesToArrow;
pub use csv::{CoordinateSource, CsvToZones, CsvZoneConfig, GeometryFormat, csv_to_zone_csv, write_zones_csv};
pub use parquet::{ZonesToGeoParquet, write_geoparquet};
