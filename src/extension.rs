//! Data extension codec: the optional 7-byte block immediately following a
//! position, encoding course/speed, power-height-gain-directivity, range,
//! or omnidirectional DF strength.
//!
//! All four shapes are distinguished by fixed byte offsets in the 7-byte
//! block, so decoding is a shape match rather than a grammar.

/// A 7-byte extension immediately following a position block.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataExtension {
    /// Course in degrees (0-360) and speed in knots.
    CourseSpeed { course: u16, speed: u16 },
    /// Power/height/gain/directivity (digipeater or beacon antenna).
    Phg { power: u8, height: u8, gain: u8, directivity: u8 },
    /// Pre-calculated radio range, in miles.
    Rng { miles: u16 },
    /// Omnidirectional DF signal strength/height/gain/directivity.
    Dfs { strength: u8, height: u8, gain: u8, directivity: u8 },
}

const HEIGHT_BASE: u32 = 10;

fn digit(b: u8) -> Option<u32> {
    if b.is_ascii_digit() {
        Some((b - b'0') as u32)
    } else {
        None
    }
}

fn three_digits(bytes: &[u8]) -> Option<u32> {
    let (a, b, c) = (digit(bytes[0])?, digit(bytes[1])?, digit(bytes[2])?);
    Some(a * 100 + b * 10 + c)
}

/// Attempt to parse a 7-byte extension from the front of `bytes`. Returns
/// `None` (not an error) if the bytes don't match any recognised shape -
/// callers treat that as "no extension present" and leave the bytes as
/// comment text.
pub fn decode(bytes: &[u8]) -> Option<DataExtension> {
    if bytes.len() < 7 {
        return None;
    }
    let head = &bytes[0..7];

    if head[3] == b'/' {
        let course = three_digits(&head[0..3])?;
        let speed = three_digits(&head[4..7])?;
        if course <= 360 {
            return Some(DataExtension::CourseSpeed { course: course as u16, speed: speed as u16 });
        }
        return None;
    }

    if &head[0..3] == b"PHG" {
        let power = digit(head[3])?;
        let height = digit(head[4])?;
        let gain = digit(head[5])?;
        let directivity = digit(head[6])?;
        return Some(DataExtension::Phg {
            power: power as u8,
            height: height as u8,
            gain: gain as u8,
            directivity: directivity as u8,
        });
    }

    if &head[0..3] == b"RNG" {
        let miles = three_digits(&head[4..7])?;
        return Some(DataExtension::Rng { miles: miles as u16 });
    }

    if &head[0..3] == b"DFS" {
        let strength = digit(head[3])?;
        let height = digit(head[4])?;
        let gain = digit(head[5])?;
        let directivity = digit(head[6])?;
        return Some(DataExtension::Dfs {
            strength: strength as u8,
            height: height as u8,
            gain: gain as u8,
            directivity: directivity as u8,
        });
    }

    None
}

/// Encode a data extension to its fixed 7-byte textual form.
pub fn encode(ext: &DataExtension) -> String {
    match *ext {
        DataExtension::CourseSpeed { course, speed } => format!("{course:03}/{speed:03}"),
        DataExtension::Phg { power, height, gain, directivity } => {
            format!("PHG{power}{height}{gain}{directivity}")
        }
        DataExtension::Rng { miles } => format!("RNG{miles:04}"),
        DataExtension::Dfs { strength, height, gain, directivity } => {
            format!("DFS{strength}{height}{gain}{directivity}")
        }
    }
}

/// Decode the PHG height field: `10 * 2^digit` feet.
pub fn phg_height_feet(height_digit: u8) -> u32 {
    HEIGHT_BASE * 2u32.pow(height_digit as u32)
}

/// Decode the PHG/DFS gain field: the digit itself, in dB.
pub fn phg_gain_db(gain_digit: u8) -> u8 {
    gain_digit
}
