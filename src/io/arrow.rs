use crate::coord::Crs;
use crate::error::GeohexError;
use crate::zone::Zone;
use arrow_array::{Float64Array, Int64Array, RecordBatch, StringArray, UInt8Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn crs_metadata(crs: Crs) -> Arc<Metadata> {
    let crs = geoarrow_schema::Crs::from_authority_code(crs.authority_code().to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`Zone`]s to Arrow arrays.
///
/// Implemented for `[Zone]` and `Vec<Zone>`. Geometry is written in the
/// requested CRS: projected meters or lon/lat degrees.
pub trait ZonesToArrow {
    /// Converts zone centers to an Arrow PointArray.
    fn to_arrow_points(&self, crs: Crs) -> PointArray;
    /// Converts zones to an Arrow PolygonArray of hexagons.
    fn to_arrow_polygons(&self, crs: Crs) -> PolygonArray;
    /// Converts zones to a RecordBatch with code, level, x, y, lon, lat, and geometry.
    fn to_record_batch(&self, crs: Crs) -> Result<RecordBatch, GeohexError>;
}

impl ZonesToArrow for [Zone] {
    fn to_arrow_points(&self, crs: Crs) -> PointArray {
        let point = PointType::new(Dimension::XY, crs_metadata(crs));
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for zone in self {
            let center = match crs {
                Crs::Mercator => zone.center(),
                Crs::Wgs84 => zone.center_deg(),
            };
            builder.push_point(Some(&center));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self, crs: Crs) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, crs_metadata(crs));
        let polygons: Vec<_> = self.par_iter().map(|z: &Zone| z.to_polygon_in(crs)).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self, crs: Crs) -> Result<RecordBatch, GeohexError> {
        let polygon_array = self.to_arrow_polygons(crs);
        let codes: StringArray = self.iter().map(|z| Some(z.code())).collect();
        let levels: UInt8Array = self.iter().map(|z| Some(z.level())).collect();
        let xs: Int64Array = self.iter().map(|z| Some(z.x())).collect();
        let ys: Int64Array = self.iter().map(|z| Some(z.y())).collect();
        let lons: Float64Array = self.iter().map(|z| Some(z.lon())).collect();
        let lats: Float64Array = self.iter().map(|z| Some(z.lat())).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("code", DataType::Utf8, false),
            Field::new("level", DataType::UInt8, false),
            Field::new("x", DataType::Int64, false),
            Field::new("y", DataType::Int64, false),
            Field::new("lon", DataType::Float64, false),
            Field::new("lat", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(codes),
                Arc::new(levels),
                Arc::new(xs),
                Arc::new(ys),
                Arc::new(lons),
                Arc::new(lats),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| GeohexError::IoError(e.to_string()))
    }
}

impl ZonesToArrow for Vec<Zone> {
    fn to_arrow_points(&self, crs: Crs) -> PointArray {
        self.as_slice().to_arrow_points(crs)
    }

    fn to_arrow_polygons(&self, crs: Crs) -> PolygonArray {
        self.as_slice().to_arrow_polygons(crs)
    }

    fn to_record_batch(&self, crs: Crs) -> Result<RecordBatch, GeohexError> {
        self.as_slice().to_record_batch(crs)
    }
}
