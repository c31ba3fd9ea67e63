/// Alphabet of the two-character code head, indexed 0..52.
pub const HEX_KEY: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Radix of the code head: `head = index(c0) * HEAD_RADIX + index(c1)`.
pub(crate) const HEAD_RADIX: usize = 30;

/// Number of leading step digits folded into the code head.
pub(crate) const HEAD_DIGITS: usize = 3;

/// Maximum supported level.
///
/// Keeps `3^(level + 2)` inside `i64` and cell sides far above the resolution of
/// projected `f64` coordinates.
pub const MAX_LEVEL: u8 = 25;

/// Number of child cells per cell.
pub const CHILDREN_PER_ZONE: usize = 9;
