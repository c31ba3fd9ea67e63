use crate::coord::{Crs, ProjectionConstants};
use crate::error::GeohexError;
use crate::geom::parse_geometry_in;
use crate::zone::Zone;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

enum SourceIndices {
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text, e.g. `POLYGON((...))`
    Wkt,
    GeoJson,
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column holding WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate X and Y columns (lon/lat or projected meters)
    CoordinateColumns { x_column: String, y_column: String },
}

#[derive(Debug, Clone)]
pub struct CsvZoneConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub level: u8,
    pub crs: Crs,
    pub constants: ProjectionConstants,
    pub include_zone_geometry: Option<GeometryFormat>,
}

impl CsvZoneConfig {
    /// Config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use geohex_rs::CsvZoneConfig;
    ///
    /// let config = CsvZoneConfig::new("geometry", 7);
    /// assert_eq!(config.level, 7);
    /// ```
    pub fn new(geometry_column: impl Into<String>, level: u8) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            level,
            crs: Crs::default(),
            constants: ProjectionConstants::default(),
            include_zone_geometry: None,
        }
    }

    /// Config for a CSV with separate X/Y columns.
    ///
    /// # Example
    /// ```
    /// use geohex_rs::{CsvZoneConfig, Crs};
    ///
    /// let config = CsvZoneConfig::from_coords("Longitude", "Latitude", 7);
    /// let projected = CsvZoneConfig::from_coords("x", "y", 7).crs(Crs::Mercator);
    /// ```
    pub fn from_coords(x_column: impl Into<String>, y_column: impl Into<String>, level: u8) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                x_column: x_column.into(),
                y_column: y_column.into(),
            },
            exclude_columns: Vec::new(),
            level,
            crs: Crs::default(),
            constants: ProjectionConstants::default(),
            include_zone_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    /// Projection constants of the grid the rows are mapped onto.
    pub fn constants(mut self, constants: ProjectionConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Adds a `zone_geometry` column holding each zone's hexagon in the config's CRS.
    pub fn with_zone_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_zone_geometry = Some(format);
        self
    }
}

pub trait CsvToZones {
    fn to_zone_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvZoneConfig,
    ) -> Result<(), GeohexError>;
}

impl<P: AsRef<Path>> CsvToZones for P {
    fn to_zone_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvZoneConfig,
    ) -> Result<(), GeohexError> {
        csv_to_zone_csv(self, output_path, config)
    }
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    geojson::Geometry::from(polygon).to_string()
}

fn column_index(headers: &csv::StringRecord, name: &str, what: &str) -> Result<usize, GeohexError> {
    if name.is_empty() {
        return Err(GeohexError::CsvError(format!(
            "{} column name cannot be empty",
            what
        )));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GeohexError::CsvError(format!("{} column '{}' not found", what, name)))
}

fn parse_field(record: &csv::StringRecord, idx: usize, what: &str) -> Result<f64, GeohexError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| GeohexError::CsvError(format!("Missing {} column at index {}", what, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| GeohexError::CsvError(format!("Invalid {} coordinate: '{}'", what, raw)))
}

/// Converts a CSV with geometry or coordinate columns to a CSV keyed by zone code.
///
/// Rows are streamed. A line geometry yields one output row per zone it
/// crosses, each carrying the row's remaining columns. The source geometry
/// or coordinate columns are always dropped.
///
/// # Example
///
/// ```no_run
/// use geohex_rs::{csv_to_zone_csv, CsvZoneConfig, GeometryFormat};
///
/// let config = CsvZoneConfig::from_coords("lon", "lat", 7)
///     .with_zone_geometry(GeometryFormat::Wkt);
///
/// csv_to_zone_csv("stations.csv", "stations_zoned.csv", &config).unwrap();
/// ```
pub fn csv_to_zone_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvZoneConfig,
) -> Result<(), GeohexError> {
    let file = File::open(csv_path).map_err(|e| GeohexError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GeohexError::CsvError(e.to_string()))?
        .clone();

    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns { x_column, y_column } => {
            let x_idx = column_index(&headers, x_column, "X")?;
            let y_idx = column_index(&headers, y_column, "Y")?;
            (
                SourceIndices::Coordinates { x_idx, y_idx },
                HashSet::from([x_idx, y_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| GeohexError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["code"];
    if config.include_zone_geometry.is_some() {
        header_row.push("zone_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| GeohexError::CsvError(e.to_string()))?;

    let (mut rows_in, mut rows_out) = (0usize, 0usize);
    for result in reader.records() {
        let record = result.map_err(|e| GeohexError::CsvError(e.to_string()))?;
        rows_in += 1;

        let zones = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    GeohexError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                let geom = parse_geometry_in(geom_str, config.crs)?;
                Zone::from_geometry_with(geom, config.level, config.crs, &config.constants)?
            }
            SourceIndices::Coordinates { x_idx, y_idx } => {
                let x = parse_field(&record, *x_idx, "X")?;
                let y = parse_field(&record, *y_idx, "Y")?;
                Zone::from_geometry_with(
                    geo_types::Geometry::Point(geo_types::Point::new(x, y)),
                    config.level,
                    config.crs,
                    &config.constants,
                )?
            }
        };

        for zone in zones {
            let mut row: Vec<String> = vec![zone.code().to_string()];

            if let Some(format) = config.include_zone_geometry {
                let polygon = zone.to_polygon_in(config.crs);
                row.push(match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                });
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| GeohexError::CsvError(e.to_string()))?;
            rows_out += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| GeohexError::CsvError(e.to_string()))?;

    debug!(rows_in, rows_out, level = config.level, "zoned csv written");
    Ok(())
}

#[derive(Serialize)]
struct ZoneRow<'a> {
    code: &'a str,
    level: u8,
    x: i64,
    y: i64,
    geometry: String,
}

/// Writes one row per zone with columns `code,level,x,y,geometry`.
///
/// `geometry` is the zone hexagon as WKT, in meters or degrees per `crs`.
pub fn write_zones_csv(
    zones: &[Zone],
    path: impl AsRef<Path>,
    crs: Crs,
) -> Result<(), GeohexError> {
    let mut writer =
        csv::Writer::from_path(path.as_ref()).map_err(|e| GeohexError::IoError(e.to_string()))?;

    for zone in zones {
        let geometry = match crs {
            Crs::Wgs84 => zone.wkt_deg(),
            Crs::Mercator => zone.wkt(),
        };
        writer
            .serialize(ZoneRow {
                code: zone.code(),
                level: zone.level(),
                x: zone.x(),
                y: zone.y(),
                geometry,
            })
            .map_err(|e| GeohexError::CsvError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| GeohexError::IoError(e.to_string()))?;

    debug!(rows = zones.len(), path = %path.as_ref().display(), "wrote zones csv");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn io_err(e: std::io::Error) -> GeohexError {
        GeohexError::IoError(e.to_string())
    }

    #[test]
    fn test_csv_from_geojson_column() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "STATION,TYPE,geometry").map_err(io_err)?;
        writeln!(
            file,
            "TYO,Rail,\"{{\"\"type\"\":\"\"Point\"\",\"\"coordinates\"\":[139.766084,35.681382]}}\""
        )
        .map_err(io_err)?;

        let config = CsvZoneConfig::new("geometry", 4);
        csv_to_zone_csv(&csv_path, &output_path, &config)?;

        let output = std::fs::read_to_string(&output_path).map_err(io_err)?;
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("code,STATION,TYPE"));
        assert_eq!(lines.next(), Some("XM4885,TYO,Rail"));
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[test]
    fn test_csv_from_wkt_column_via_trait() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,wkt,note").map_err(io_err)?;
        writeln!(file, "1,\"POINT(139.766084 35.681382)\",keep").map_err(io_err)?;

        let config = CsvZoneConfig::new("wkt", 4)
            .exclude(vec!["note".into()])
            .with_zone_geometry(GeometryFormat::Wkt);
        csv_path.to_zone_csv(&output_path, &config)?;

        let output = std::fs::read_to_string(&output_path).map_err(io_err)?;
        assert!(output.starts_with("code,zone_geometry,ID\n"));
        assert!(output.contains("XM4885,\"POLYGON(("));
        assert!(!output.contains("keep"));
        Ok(())
    }

    #[test]
    fn test_csv_from_coords() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,Longitude,Latitude,Description").map_err(io_err)?;
        writeln!(file, "1,139.766084,35.681382,Tokyo Station").map_err(io_err)?;
        writeln!(file, "2, -74.0 , 40.7 ,New York").map_err(io_err)?;

        let config = CsvZoneConfig::from_coords("Longitude", "Latitude", 1)
            .with_zone_geometry(GeometryFormat::GeoJson);
        csv_to_zone_csv(&csv_path, &output_path, &config)?;

        let output = std::fs::read_to_string(&output_path).map_err(io_err)?;
        assert!(output.starts_with("code,zone_geometry,ID,Description\n"));
        assert!(output.contains("PF3,"));
        assert!(output.contains("Polygon"));
        assert!(!output.contains("Longitude"));
        Ok(())
    }

    #[test]
    fn test_csv_with_custom_constants() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,lon,lat").map_err(io_err)?;
        writeln!(file, "1,139.766084,35.681382").map_err(io_err)?;

        let canonical = ProjectionConstants::default();
        let coarse =
            ProjectionConstants::new(canonical.half_equator(), canonical.base_hex_side() * 3.0)?;
        let config = CsvZoneConfig::from_coords("lon", "lat", 5).constants(coarse);
        csv_to_zone_csv(&csv_path, &output_path, &config)?;

        let expected = Zone::from_axial_with(5, 417, -149, &coarse)?;
        let output = std::fs::read_to_string(&output_path).map_err(io_err)?;
        assert_eq!(output, format!("code,ID\n{},1\n", expected.code()));
        Ok(())
    }

    #[test]
    fn test_csv_missing_column() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,lon,lat").map_err(io_err)?;
        writeln!(file, "1,139.7,35.6").map_err(io_err)?;

        let config = CsvZoneConfig::from_coords("Longitude", "lat", 4);
        assert!(matches!(
            csv_to_zone_csv(&csv_path, &output_path, &config),
            Err(GeohexError::CsvError(_))
        ));

        let config = CsvZoneConfig::new("", 4);
        assert!(matches!(
            csv_to_zone_csv(&csv_path, &output_path, &config),
            Err(GeohexError::CsvError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_csv_bad_coordinate() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "lon,lat").map_err(io_err)?;
        writeln!(file, "east,35.6").map_err(io_err)?;

        let config = CsvZoneConfig::from_coords("lon", "lat", 4);
        assert!(csv_to_zone_csv(&csv_path, &output_path, &config).is_err());
        Ok(())
    }

    #[test]
    fn test_write_zones_csv() -> Result<(), GeohexError> {
        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("zones.csv");
        let zones = vec![Zone::from_code("XM4885")?, Zone::from_code("OY")?];

        write_zones_csv(&zones, &path, Crs::Mercator)?;

        let output = std::fs::read_to_string(&path).map_err(io_err)?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "code,level,x,y,geometry");
        assert!(lines[1].starts_with("XM4885,4,417,-149,\"POLYGON(("));
        assert!(lines[2].starts_with("OY,0,0,0,\"POLYGON((-1484259.877037037 0, "));
        Ok(())
    }
}
