pub mod constants;
mod code;
mod grid;

pub use code::{decode, encode};
pub use constants::{CHILDREN_PER_ZONE, HEX_KEY, MAX_LEVEL};
pub(crate) use grid::axial_limit;
pub use grid::{
    axial_to_meters, axial_to_wgs84, cell_side, check_level, meters_to_axial, wgs84_to_axial,
};
