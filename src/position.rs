//! Position codec: uncompressed and compressed position blocks, altitude
//! lifted from the comment, and data-extension consumption.

use crate::base91;
use crate::coordinates;
use crate::error::{PositionError, UnknownShapeSnafu, WrongLengthSnafu};
use crate::extension::{self, DataExtension};
use snafu::ensure;

/// A decoded APRS position, uncompressed or compressed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Count of low-order lat/lon digits masked by ambiguity (0-4).
    /// Always 0 for a compressed position.
    pub ambiguity: u8,
    pub symbol_table: char,
    pub symbol_code: char,
    pub compressed: bool,
    /// Altitude in feet, if present (from the compressed compression-type
    /// byte, or lifted from an `/A=dddddd` comment marker).
    pub altitude: Option<i32>,
    /// Course/speed, PHG, RNG, or DFS extension, if present.
    pub extension: Option<DataExtension>,
}

const UNCOMPRESSED_LEN: usize = 19;
const COMPRESSED_LEN: usize = 13;

fn is_compressed_lead(b: u8) -> bool {
    b == b'/' || b == b'\\' || b.is_ascii_uppercase() || (b'a'..=b'j').contains(&b)
}

/// Decode a position block from the front of `bytes`. Returns the
/// position and the number of bytes consumed (19 uncompressed, 13
/// compressed).
pub fn decode(bytes: &[u8]) -> Result<(Position, usize), PositionError> {
    let lead = *bytes.first().ok_or_else(|| WrongLengthSnafu { bytes: bytes.to_vec() }.build())?;
    if is_compressed_lead(lead) {
        decode_compressed(bytes)
    } else if lead.is_ascii_digit() || lead == b' ' {
        decode_uncompressed(bytes)
    } else {
        Err(UnknownShapeSnafu { bytes: bytes.to_vec() }.build())
    }
}

fn decode_uncompressed(bytes: &[u8]) -> Result<(Position, usize), PositionError> {
    ensure!(bytes.len() >= UNCOMPRESSED_LEN, WrongLengthSnafu { bytes: bytes.to_vec() });
    let block = &bytes[0..UNCOMPRESSED_LEN];

    let (latitude, lat_ambiguity) = coordinates::decode_latitude(&block[0..8])?;
    let symbol_table = block[8] as char;
    let (longitude, lon_ambiguity) = coordinates::decode_longitude(&block[9..18])?;
    let symbol_code = block[18] as char;

    ensure!(lat_ambiguity == lon_ambiguity, crate::error::InconsistentAmbiguitySnafu { bytes: block.to_vec() });

    Ok((
        Position {
            latitude,
            longitude,
            ambiguity: lat_ambiguity,
            symbol_table,
            symbol_code,
            compressed: false,
            altitude: None,
            extension: None,
        },
        UNCOMPRESSED_LEN,
    ))
}

fn decode_compressed(bytes: &[u8]) -> Result<(Position, usize), PositionError> {
    ensure!(bytes.len() >= COMPRESSED_LEN, WrongLengthSnafu { bytes: bytes.to_vec() });
    let block = &bytes[0..COMPRESSED_LEN];

    let symbol_table = block[0] as char;
    let lat_n = base91::decode(std::str::from_utf8(&block[1..5]).map_err(|_| {
        crate::error::MalformedDigitsSnafu { bytes: block.to_vec(), offset: 1 }.build()
    })?)?;
    let lon_n = base91::decode(std::str::from_utf8(&block[5..9]).map_err(|_| {
        crate::error::MalformedDigitsSnafu { bytes: block.to_vec(), offset: 5 }.build()
    })?)?;
    let symbol_code = block[9] as char;
    let slot = &block[10..12];
    let compression_type = block[12];

    let latitude = coordinates::compressed_latitude(lat_n);
    let longitude = coordinates::compressed_longitude(lon_n);

    let (altitude, extension) = decode_compressed_slot(slot, compression_type);

    Ok((
        Position {
            latitude,
            longitude,
            ambiguity: 0,
            symbol_table,
            symbol_code,
            compressed: true,
            altitude,
            extension,
        },
        COMPRESSED_LEN,
    ))
}

/// Interpret the 2-byte compressed course/speed/altitude slot. Bits 3-4 of
/// the compression-type byte select the fix source (live GPS, old GPS,
/// NMEA sentence type); that detail isn't surfaced as a typed field today,
/// only the altitude/course-speed payload is.
///
/// A literal `{` in the first byte is the altitude marker, not a base-91
/// digit; the altitude itself is carried entirely in the second byte.
fn decode_compressed_slot(slot: &[u8], _compression_type: u8) -> (Option<i32>, Option<DataExtension>) {
    if slot[0] == b'{' {
        if let Ok(n) = base91::decode(std::str::from_utf8(&slot[1..2]).unwrap_or("")) {
            let feet = 1.002f64.powi(n as i32).round() as i32;
            return (Some(feet), None);
        }
        return (None, None);
    }

    let c1 = slot[0];
    let c2 = slot[1];
    if (33..=122).contains(&c1) && (33..=122).contains(&c2) {
        let course = ((c1 as i32 - 33) * 4) as u16;
        let speed = (1.08f64.powi(c2 as i32 - 33) - 1.0).round() as u16;
        return (None, Some(DataExtension::CourseSpeed { course, speed }));
    }
    (None, None)
}

/// Encode a position back to its wire form.
pub fn encode(pos: &Position) -> Vec<u8> {
    if pos.compressed {
        encode_compressed(pos)
    } else {
        encode_uncompressed(pos)
    }
}

fn encode_uncompressed(pos: &Position) -> Vec<u8> {
    let mut out = Vec::with_capacity(UNCOMPRESSED_LEN);
    out.extend_from_slice(coordinates::encode_latitude(pos.latitude, pos.ambiguity).as_bytes());
    out.push(pos.symbol_table as u8);
    out.extend_from_slice(coordinates::encode_longitude(pos.longitude, pos.ambiguity).as_bytes());
    out.push(pos.symbol_code as u8);
    out
}

fn encode_compressed(pos: &Position) -> Vec<u8> {
    let mut out = Vec::with_capacity(COMPRESSED_LEN);
    out.push(pos.symbol_table as u8);
    out.extend_from_slice(base91::encode(coordinates::latitude_to_compressed(pos.latitude), 4).as_bytes());
    out.extend_from_slice(base91::encode(coordinates::longitude_to_compressed(pos.longitude), 4).as_bytes());
    out.push(pos.symbol_code as u8);

    if let Some(altitude) = pos.altitude {
        let n = ((altitude.max(1) as f64).ln() / 1.002f64.ln()).round().clamp(0.0, 90.0) as u32;
        out.push(b'{');
        out.extend_from_slice(base91::encode(n, 1).as_bytes());
        out.push(b'G');
    } else if let Some(DataExtension::CourseSpeed { course, speed }) = pos.extension {
        let c1 = (course / 4) as u8 + 33;
        let c2 = (((speed as f64 + 1.0).ln() / 1.08f64.ln()).round() as u8).saturating_add(33);
        out.push(c1);
        out.push(c2);
        out.push(b' ');
    } else {
        out.extend_from_slice(b"  ");
        out.push(b' ');
    }

    out
}

/// Scan `comment` for a single `/A=dddddd` altitude marker (six decimal
/// digits, optionally a leading `-`), removing the matched substring and
/// returning the altitude in feet.
pub fn lift_altitude(comment: &[u8]) -> (Option<i32>, Vec<u8>) {
    let marker = b"/A=";
    let mut i = 0;
    while i + marker.len() <= comment.len() {
        if &comment[i..i + marker.len()] == marker {
            let digits_start = i + marker.len();
            let (sign, digits_start) = if comment.get(digits_start) == Some(&b'-') {
                (-1i32, digits_start + 1)
            } else {
                (1i32, digits_start)
            };
            let digits_end = digits_start + 6;
            if digits_end <= comment.len() && comment[digits_start..digits_end].iter().all(u8::is_ascii_digit) {
                let value: i32 = std::str::from_utf8(&comment[digits_start..digits_end]).unwrap().parse().unwrap();
                let mut remaining = Vec::with_capacity(comment.len() - (digits_end - i));
                remaining.extend_from_slice(&comment[0..i]);
                remaining.extend_from_slice(&comment[digits_end..]);
                return (Some(sign * value), remaining);
            }
        }
        i += 1;
    }
    (None, comment.to_vec())
}

/// Attempt to consume a 7-byte data extension from the front of `comment`.
pub fn consume_extension(comment: &[u8]) -> (Option<DataExtension>, Vec<u8>) {
    match extension::decode(comment) {
        Some(ext) if comment.len() >= 7 => (Some(ext), comment[7..].to_vec()),
        _ => (None, comment.to_vec()),
    }
}

/// Inverse of [`lift_altitude`]: append an `/A=dddddd` marker to `comment`.
/// A no-op when `altitude` is `None`, or when `compressed` is true (a
/// compressed position's altitude lives in its course/speed/altitude slot,
/// never in the comment).
pub fn append_altitude(comment: &[u8], altitude: Option<i32>, compressed: bool) -> Vec<u8> {
    let mut out = comment.to_vec();
    if let (false, Some(alt)) = (compressed, altitude) {
        let sign = if alt < 0 { "-" } else { "" };
        out.extend_from_slice(format!("/A={sign}{:06}", alt.abs()).as_bytes());
    }
    out
}
