//! Decimal-degree conversions for uncompressed latitude/longitude text and
//! the compressed base-91 position encoding.
//!
//! Kept apart from `Position` itself so the conversion math can be tested
//! independently of the block-layout parsing that surrounds it.

use crate::error::{InconsistentAmbiguitySnafu, LatitudeOutOfRangeSnafu, LongitudeOutOfRangeSnafu, MalformedDigitsSnafu, PositionError};
use snafu::ensure;

/// Decode an uncompressed latitude field: 8 bytes `DDMM.mmH` where `H` is
/// `N` or `S`. Spaces in the low-order digit positions indicate ambiguity;
/// the masked positions are rounded to the midpoint of their range.
///
/// Returns the decoded degrees and the ambiguity count (0-4).
pub fn decode_latitude(bytes: &[u8]) -> Result<(f64, u8), PositionError> {
    ensure!(bytes.len() == 8, MalformedDigitsSnafu { bytes: bytes.to_vec(), offset: 0 });
    let hemisphere = bytes[7];
    ensure!(
        hemisphere == b'N' || hemisphere == b'S',
        MalformedDigitsSnafu { bytes: bytes.to_vec(), offset: 7 }
    );
    let (deg, minutes, ambiguity) = decode_ddmm(&bytes[0..7], 2)?;
    let sign = if hemisphere == b'S' { -1.0 } else { 1.0 };
    let value = sign * (deg as f64 + minutes / 60.0);
    ensure!((-90.0..=90.0).contains(&value), LatitudeOutOfRangeSnafu { value });
    Ok((value, ambiguity))
}

/// Decode an uncompressed longitude field: 9 bytes `DDDMM.mmH`, `H` is `E`
/// or `W`.
pub fn decode_longitude(bytes: &[u8]) -> Result<(f64, u8), PositionError> {
    ensure!(bytes.len() == 9, MalformedDigitsSnafu { bytes: bytes.to_vec(), offset: 0 });
    let hemisphere = bytes[8];
    ensure!(
        hemisphere == b'E' || hemisphere == b'W',
        MalformedDigitsSnafu { bytes: bytes.to_vec(), offset: 8 }
    );
    let (deg, minutes, ambiguity) = decode_ddmm(&bytes[0..8], 3)?;
    let sign = if hemisphere == b'W' { -1.0 } else { 1.0 };
    let value = sign * (deg as f64 + minutes / 60.0);
    ensure!((-180.0..=180.0).contains(&value), LongitudeOutOfRangeSnafu { value });
    Ok((value, ambiguity))
}

/// Shared `DDMM.mm`/`DDDMM.mm` decoder. `deg_width` is 2 for latitude, 3
/// for longitude; the minutes-with-fraction run always occupies the
/// remaining 5 characters (`MM.mm`).
fn decode_ddmm(bytes: &[u8], deg_width: usize) -> Result<(u32, f64, u8), PositionError> {
    let mut ambiguity = 0u8;
    let mut digit_or_space = |offset: usize| -> Result<Option<u32>, PositionError> {
        let b = bytes[offset];
        if b == b' ' {
            Ok(None)
        } else if b.is_ascii_digit() {
            Ok(Some((b - b'0') as u32))
        } else {
            Err(MalformedDigitsSnafu { bytes: bytes.to_vec(), offset }.build())
        }
    };

    let mut deg = 0u32;
    for i in 0..deg_width {
        deg = deg * 10 + digit_or_space(i)?.ok_or_else(|| MalformedDigitsSnafu { bytes: bytes.to_vec(), offset: i }.build())?;
    }

    ensure!(bytes[deg_width + 2] == b'.', MalformedDigitsSnafu { bytes: bytes.to_vec(), offset: deg_width + 2 });

    // minute tens, minute ones, '.', tenths, hundredths - low-order digits
    // (hundredths, then tenths, then minute ones) may be ambiguity spaces.
    let positions = [deg_width, deg_width + 1, deg_width + 3, deg_width + 4];
    let mut digits = [0u32; 4];
    let mut seen_space = false;
    for (slot, &pos) in positions.iter().enumerate().rev() {
        match digit_or_space(pos)? {
            Some(d) => {
                ensure!(!seen_space, InconsistentAmbiguitySnafu { bytes: bytes.to_vec() });
                digits[slot] = d;
            }
            None => {
                seen_space = true;
                ambiguity += 1;
                // midpoint of the masked range: digit 5 for a single masked
                // position, propagated to whichever slot is being rounded.
                digits[slot] = 5;
            }
        }
    }

    let minute_whole = digits[0] * 10 + digits[1];
    let minute_frac = digits[2] as f64 / 10.0 + digits[3] as f64 / 100.0;
    Ok((deg, minute_whole as f64 + minute_frac, ambiguity))
}

/// Encode decimal-degree latitude back to `DDMM.mmH`, masking the
/// low-order `ambiguity` digits with spaces.
pub fn encode_latitude(deg: f64, ambiguity: u8) -> String {
    let hemisphere = if deg < 0.0 { 'S' } else { 'N' };
    encode_ddmm(deg.abs(), 2, ambiguity, hemisphere)
}

/// Encode decimal-degree longitude back to `DDDMM.mmH`.
pub fn encode_longitude(deg: f64, ambiguity: u8) -> String {
    let hemisphere = if deg < 0.0 { 'W' } else { 'E' };
    encode_ddmm(deg.abs(), 3, ambiguity, hemisphere)
}

fn encode_ddmm(deg: f64, deg_width: usize, ambiguity: u8, hemisphere: char) -> String {
    let whole_deg = deg.trunc() as u32;
    let minutes = (deg.fract()) * 60.0;
    let minute_whole = minutes.trunc() as u32;
    let minute_frac = ((minutes.fract()) * 100.0).round() as u32;

    let mut digits = vec![minute_whole / 10, minute_whole % 10, minute_frac / 10, minute_frac % 10];
    for slot in (4 - ambiguity as usize)..4 {
        digits[slot] = u32::MAX; // marker for space
    }

    let fmt_digit = |d: u32| if d == u32::MAX { ' ' } else { char::from_digit(d, 10).unwrap() };

    format!(
        "{:0width$}{}{}.{}{}{}",
        whole_deg,
        fmt_digit(digits[0]),
        fmt_digit(digits[1]),
        fmt_digit(digits[2]),
        fmt_digit(digits[3]),
        hemisphere,
        width = deg_width,
    )
}

/// Compressed-position latitude: `lat = 90 - n/380926`.
pub fn compressed_latitude(n: u32) -> f64 {
    90.0 - (n as f64) / 380926.0
}

/// Compressed-position longitude: `lon = -180 + n/190463`.
pub fn compressed_longitude(n: u32) -> f64 {
    -180.0 + (n as f64) / 190463.0
}

/// Inverse of [`compressed_latitude`], rounding to the nearest base-91 value.
pub fn latitude_to_compressed(deg: f64) -> u32 {
    ((90.0 - deg) * 380926.0).round() as u32
}

/// Inverse of [`compressed_longitude`].
pub fn longitude_to_compressed(deg: f64) -> u32 {
    ((deg + 180.0) * 190463.0).round() as u32
}
