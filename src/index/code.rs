use crate::error::GeohexError;
use crate::index::constants::{HEAD_DIGITS, HEAD_RADIX, HEX_KEY, MAX_LEVEL};
use crate::index::grid::check_level;

/// Splits one axis at one power of three into a ternary digit, moving the
/// coordinate toward zero by `base` when the digit is not the middle one.
fn take_digit(coord: &mut i64, base: i64) -> u8 {
    let boundary = (base + 1) / 2;
    if *coord <= -boundary {
        *coord += base;
        0
    } else if *coord >= boundary {
        *coord -= base;
        2
    } else {
        1
    }
}

fn key_index(code: &str, c: u8) -> Result<usize, GeohexError> {
    HEX_KEY
        .iter()
        .position(|&k| k == c)
        .ok_or_else(|| GeohexError::malformed(code, "head must be two letters A-Z or a-z"))
}

/// Encodes axial coordinates at `level` into a zone code.
///
/// The code is `level + 2` characters: two letters carrying the three
/// coarsest step digits, then one digit `0`-`8` per remaining level. Each
/// step digit is `3 * x_digit + y_digit` for the balanced ternary digits of
/// the two axes.
///
/// # Example
/// ```
/// use geohex_rs::{decode, encode};
///
/// # fn main() -> Result<(), geohex_rs::GeohexError> {
/// let code = encode(7, -1632, 9851)?;
/// assert_eq!(code, "RU6063103");
/// assert_eq!(decode(&code)?, (7, -1632, 9851));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`GeohexError::InvalidArgument`] - level above `MAX_LEVEL`, or axial
///   coordinates too large to be represented at `level`
pub fn encode(level: u8, x: i64, y: i64) -> Result<String, GeohexError> {
    check_level(level)?;

    let (mut rest_x, mut rest_y) = (x, y);
    let mut digits = Vec::with_capacity(level as usize + 3);
    for exp in (0..=level as u32 + 2).rev() {
        let base = 3_i64.pow(exp);
        let x_digit = take_digit(&mut rest_x, base);
        let y_digit = take_digit(&mut rest_y, base);
        digits.push(3 * x_digit + y_digit);
    }

    if rest_x != 0 || rest_y != 0 {
        return Err(GeohexError::invalid(format!(
            "axial ({}, {}) cannot be encoded at level {}",
            x, y, level
        )));
    }

    let head = digits[..HEAD_DIGITS]
        .iter()
        .fold(0_usize, |acc, &d| acc * 10 + d as usize);

    let mut code = String::with_capacity(level as usize + 2);
    code.push(HEX_KEY[head / HEAD_RADIX] as char);
    code.push(HEX_KEY[head % HEAD_RADIX] as char);
    code.extend(digits[HEAD_DIGITS..].iter().map(|&d| (b'0' + d) as char));

    Ok(code)
}

/// Decodes a zone code into `(level, x, y)`.
///
/// # Errors
///
/// - [`GeohexError::MalformedCode`] - the code is shorter than two characters,
///   longer than `MAX_LEVEL + 2`, has a head outside the letter alphabet or
///   one that no axial pair encodes to, or a body character outside `0`-`8`
///
/// The head check is stricter than the reference GeoHex decoders, which
/// accept any two-letter head and decode a second letter past index 29 or a
/// head with a digit 9 (such as 889 to 899) into coordinates that no point
/// maps to. Such codes are rejected here rather than decoded into a zone
/// whose code would not round-trip.
pub fn decode(code: &str) -> Result<(u8, i64, i64), GeohexError> {
    let bytes = code.as_bytes();
    if bytes.len() < 2 {
        return Err(GeohexError::malformed(code, "shorter than 2 characters"));
    }
    if bytes.len() - 2 > MAX_LEVEL as usize {
        return Err(GeohexError::malformed(
            code,
            &format!("longer than {} characters", MAX_LEVEL as usize + 2),
        ));
    }
    let level = (bytes.len() - 2) as u8;

    let quotient = key_index(code, bytes[0])?;
    let remainder = key_index(code, bytes[1])?;
    if remainder >= HEAD_RADIX {
        return Err(GeohexError::malformed(code, "head is not a canonical pair"));
    }
    let head = quotient * HEAD_RADIX + remainder;
    if head >= 1000 {
        return Err(GeohexError::malformed(code, "head is out of range"));
    }

    let mut digits = Vec::with_capacity(bytes.len() + 1);
    digits.extend([head / 100, head / 10 % 10, head % 10].map(|d| d as u8));
    for &c in &bytes[2..] {
        if !(b'0'..=b'8').contains(&c) {
            return Err(GeohexError::malformed(code, "body digits must be 0-8"));
        }
        digits.push(c - b'0');
    }
    if digits[..HEAD_DIGITS].iter().any(|&d| d > 8) {
        return Err(GeohexError::malformed(code, "head is out of range"));
    }

    let (mut x, mut y) = (0_i64, 0_i64);
    for (i, &digit) in digits.iter().enumerate() {
        let base = 3_i64.pow(level as u32 + 2 - i as u32);
        match digit / 3 {
            0 => x -= base,
            2 => x += base,
            _ => {}
        }
        match digit % 3 {
            0 => y -= base,
            2 => y += base,
            _ => {}
        }
    }

    Ok((level, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known() -> Result<(), GeohexError> {
        assert_eq!(encode(7, -1632, 9851)?, "RU6063103");
        assert_eq!(encode(4, 417, -149)?, "XM4885");
        assert_eq!(encode(0, 0, 0)?, "OY");
        assert_eq!(encode(0, 1, 0)?, "Ob");
        assert_eq!(encode(1, 0, 0)?, "OY4");
        assert_eq!(encode(10, 147013, 140075)?, "QA8787155416");
        Ok(())
    }

    #[test]
    fn test_decode_known() -> Result<(), GeohexError> {
        assert_eq!(decode("RU6063103")?, (7, -1632, 9851));
        assert_eq!(decode("XM4885")?, (4, 417, -149));
        assert_eq!(decode("OY")?, (0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_level_zero_extremes() -> Result<(), GeohexError> {
        assert_eq!(encode(0, -13, -13)?, "AA");
        assert_eq!(encode(0, 13, 13)?, "dS");
        assert_eq!(decode("AA")?, (0, -13, -13));
        assert_eq!(decode("dS")?, (0, 13, 13));
        Ok(())
    }

    #[test]
    fn test_roundtrip_across_levels() -> Result<(), GeohexError> {
        for level in [0_u8, 1, 2, 5, 9, 15, MAX_LEVEL] {
            let limit = crate::index::grid::axial_limit(level);
            for &(x, y) in &[
                (0, 0),
                (1, -1),
                (-limit, limit),
                (limit, limit),
                (limit / 3, -limit / 7),
            ] {
                let code = encode(level, x, y)?;
                assert_eq!(code.len(), level as usize + 2);
                assert_eq!(decode(&code)?, (level, x, y));
            }
        }
        Ok(())
    }

    #[test]
    fn test_encode_out_of_range() {
        assert!(matches!(
            encode(0, 14, 0),
            Err(GeohexError::InvalidArgument(_))
        ));
        assert!(matches!(
            encode(MAX_LEVEL + 1, 0, 0),
            Err(GeohexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_malformed_codes() {
        for code in ["", "A", "1A", "A1", "RU9", "RU6a", "Rz", "zA", "é5", "RU-1"] {
            assert!(
                matches!(decode(code), Err(GeohexError::MalformedCode(_))),
                "{} should be malformed",
                code
            );
        }
        let too_long = format!("OY{}", "4".repeat(MAX_LEVEL as usize + 1));
        assert!(matches!(
            decode(&too_long),
            Err(GeohexError::MalformedCode(_))
        ));
    }

    #[test]
    fn test_decode_head_with_nine_rejected() {
        // 29 * 30 + 29 = 899
        assert!(matches!(decode("dd"), Err(GeohexError::MalformedCode(_))));
    }
}
