use crate::coord::{Crs, ProjectionConstants};
use crate::error::GeohexError;
use crate::io::arrow::ZonesToArrow;
use crate::zone::Zone;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// File metadata key holding the grid's `half_equator`.
pub const HALF_EQUATOR_KEY: &str = "geohex:half_equator";
/// File metadata key holding the grid's `base_hex_side`.
pub const BASE_HEX_SIDE_KEY: &str = "geohex:base_hex_side";
/// File metadata key holding the comma-separated levels present in the file.
pub const LEVELS_KEY: &str = "geohex:levels";

fn write_error(path: &Path, e: impl std::fmt::Display) -> GeohexError {
    GeohexError::IoError(format!("{}: {}", path.display(), e))
}

fn write_batch(batch: &RecordBatch, path: &Path, extra: Vec<KeyValue>) -> Result<(), GeohexError> {
    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();
    let schema = batch.schema();
    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| write_error(path, e))?;

    let file = File::create(path).map_err(|e| write_error(path, e))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| write_error(path, e))?;

    let encoded = encoder
        .encode_record_batch(batch)
        .map_err(|e| write_error(path, e))?;
    writer.write(&encoded).map_err(|e| write_error(path, e))?;

    writer.append_key_value_metadata(encoder.into_keyvalue().map_err(|e| write_error(path, e))?);
    for kv in extra {
        writer.append_key_value_metadata(kv);
    }
    writer.finish().map_err(|e| write_error(path, e))?;
    Ok(())
}

/// Writes a RecordBatch with a GeoArrow geometry column to a GeoParquet file.
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), GeohexError> {
    write_batch(batch, path.as_ref(), Vec::new())
}

/// The constants shared by every zone, or an error when the zones come from different grids.
fn shared_constants(zones: &[Zone]) -> Result<ProjectionConstants, GeohexError> {
    let Some(first) = zones.first() else {
        return Ok(ProjectionConstants::default());
    };
    match zones.iter().find(|z| z.constants() != first.constants()) {
        Some(other) => Err(GeohexError::invalid(format!(
            "zones {} and {} come from grids with different projection constants",
            first.code(),
            other.code()
        ))),
        None => Ok(*first.constants()),
    }
}

pub trait ZonesToGeoParquet: ZonesToArrow {
    /// Writes the zones, with hexagons in `crs`, to a GeoParquet file.
    ///
    /// The file metadata records the projection constants and levels, so a
    /// reader can rebuild each [`Zone`] from its `code` column.
    fn to_geoparquet(&self, path: impl AsRef<Path>, crs: Crs) -> Result<(), GeohexError>;
}

impl ZonesToGeoParquet for [Zone] {
    fn to_geoparquet(&self, path: impl AsRef<Path>, crs: Crs) -> Result<(), GeohexError> {
        let constants = shared_constants(self)?;
        let levels: BTreeSet<u8> = self.iter().map(|z| z.level()).collect();
        let levels = levels
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let batch = self.to_record_batch(crs)?;
        write_batch(
            &batch,
            path.as_ref(),
            vec![
                KeyValue::new(
                    HALF_EQUATOR_KEY.to_string(),
                    constants.half_equator().to_string(),
                ),
                KeyValue::new(
                    BASE_HEX_SIDE_KEY.to_string(),
                    constants.base_hex_side().to_string(),
                ),
                KeyValue::new(LEVELS_KEY.to_string(), levels),
            ],
        )?;

        debug!(
            zones = self.len(),
            crs = crs.authority_code(),
            path = %path.as_ref().display(),
            "wrote zones geoparquet"
        );
        Ok(())
    }
}

impl ZonesToGeoParquet for Vec<Zone> {
    fn to_geoparquet(&self, path: impl AsRef<Path>, crs: Crs) -> Result<(), GeohexError> {
        self.as_slice().to_geoparquet(path, crs)
    }
}
