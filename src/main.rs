use clap::{Parser, ValueEnum};
use geohex_rs::{
    Crs, GeohexError, ProjectionConstants, ZoneGrid, ZonesToGeoParquet, write_zones_csv,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geohex")]
#[command(about = "Generate GeoHex zones for an extent or around a point")]
struct Cmd {
    /// Grid level (0 is the coarsest)
    #[arg(long)]
    level: u8,

    /// Bounding box in degrees: MINX MINY MAXX MAXY
    #[arg(long, num_args = 4, value_names = ["MINX", "MINY", "MAXX", "MAXY"], allow_negative_numbers = true, conflicts_with = "center", required_unless_present = "center")]
    extent: Option<Vec<f64>>,

    /// Center point in degrees: LON LAT
    #[arg(long, num_args = 2, value_names = ["LON", "LAT"], allow_negative_numbers = true)]
    center: Option<Vec<f64>>,

    /// Steps around --center to include
    #[arg(long, default_value_t = 0, requires = "center")]
    distance: u32,

    #[arg(long)]
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Unit of the written hexagons: m (EPSG:3857) or d (EPSG:4326)
    #[arg(long, value_enum, default_value_t = Unit::D)]
    unit: Unit,

    /// JSON file with `half_equator` and `base_hex_side`
    #[arg(long)]
    constants: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Parquet,
    Csv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Unit {
    M,
    D,
}

impl From<Unit> for Crs {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::M => Crs::Mercator,
            Unit::D => Crs::Wgs84,
        }
    }
}

fn load_constants(path: &Path) -> Result<ProjectionConstants, GeohexError> {
    let file = File::open(path).map_err(|e| GeohexError::IoError(e.to_string()))?;
    serde_json::from_reader(file).map_err(|e| {
        GeohexError::InvalidArgument(format!("constants file {}: {}", path.display(), e))
    })
}

fn infer_format(path: &Path) -> Result<Format, GeohexError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("geoparquet") => Ok(Format::Parquet),
        Some("csv") => Ok(Format::Csv),
        _ => Err(GeohexError::InvalidArgument(format!(
            "cannot infer format from '{}', pass --format",
            path.display()
        ))),
    }
}

fn main() -> Result<(), GeohexError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cmd = Cmd::parse();

    let constants = match &cmd.constants {
        Some(path) => load_constants(path)?,
        None => ProjectionConstants::default(),
    };
    let format = match cmd.format {
        Some(format) => format,
        None => infer_format(&cmd.output)?,
    };

    let mut builder = ZoneGrid::builder().level(cmd.level).constants(constants);
    if let Some(e) = cmd.extent.as_deref() {
        if let [min_x, min_y, max_x, max_y] = *e {
            builder = builder.extent(min_x, min_y, max_x, max_y);
        }
    }
    if let Some(c) = cmd.center.as_deref() {
        if let [lon, lat] = *c {
            builder = builder.center(lon, lat).distance(cmd.distance);
        }
    }
    let grid = builder.build()?;

    let crs = Crs::from(cmd.unit);
    tracing::info!(
        level = cmd.level,
        zones = grid.len(),
        crs = crs.authority_code(),
        output = %cmd.output.display(),
        "writing zones"
    );

    match format {
        Format::Parquet => grid.zones().to_geoparquet(&cmd.output, crs)?,
        Format::Csv => write_zones_csv(grid.zones(), &cmd.output, crs)?,
    }

    Ok(())
}
