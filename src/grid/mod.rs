mod extent;
mod zone_grid;

pub use extent::{zones_around, zones_in_extent, zones_in_extent_with};
pub use zone_grid::{ZoneGrid, ZoneGridBuilder};
