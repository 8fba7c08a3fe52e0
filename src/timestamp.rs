//! APRS timestamp codec: DHMZ, DHML, HMS, and MDHM forms.
//!
//! The variant is selected by the 7th byte (`z`, `/`, `h`, or a digit
//! signalling the longer, suffix-less MDHM form).

use crate::error::{ComponentOutOfRangeSnafu, NonDigitSnafu, TimestampError, WrongLengthSnafu};
use snafu::ensure;

/// A decoded APRS timestamp. Which fields are meaningful depends on
/// [`variant`](Timestamp::variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timestamp {
    /// Day/hour/minute, UTC.
    DHMZ { day: u8, hour: u8, minute: u8 },
    /// Day/hour/minute, local time (zone not carried by the wire format).
    DHML { day: u8, hour: u8, minute: u8 },
    /// Hour/minute/second, UTC.
    HMS { hour: u8, minute: u8, second: u8 },
    /// Month/day/hour/minute, no explicit zone.
    MDHM { month: u8, day: u8, hour: u8, minute: u8 },
}

fn digits(bytes: &[u8]) -> Result<Vec<u32>, TimestampError> {
    bytes
        .iter()
        .map(|&b| {
            ensure!(b.is_ascii_digit(), NonDigitSnafu { bytes: bytes.to_vec() });
            Ok((b - b'0') as u32)
        })
        .collect()
}

fn two(d: &[u32], i: usize) -> u32 {
    d[i] * 10 + d[i + 1]
}

/// Decode a timestamp field. `bytes` must be the 7 (DHMZ/DHML/HMS) or 8
/// (MDHM) bytes following the DTI (and, for `PositionReport`, the DTI's
/// implied timestamp slot); the variant is selected by the 7th byte, or by
/// an all-digit 8-byte run when no suffix letter is present. Returns the
/// parsed timestamp and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(Timestamp, usize), TimestampError> {
    ensure!(bytes.len() >= 7, WrongLengthSnafu { bytes: bytes.to_vec() });

    let suffix = bytes[6];
    match suffix {
        b'z' | b'/' | b'h' => {
            let d = digits(&bytes[0..6])?;
            let (a, b, c) = (two(&d, 0), two(&d, 2), two(&d, 4));
            let ts = match suffix {
                b'z' => {
                    ensure!((1..=31).contains(&a), ComponentOutOfRangeSnafu { field: "day", value: a });
                    ensure!(b <= 23, ComponentOutOfRangeSnafu { field: "hour", value: b });
                    ensure!(c <= 59, ComponentOutOfRangeSnafu { field: "minute", value: c });
                    Timestamp::DHMZ { day: a as u8, hour: b as u8, minute: c as u8 }
                }
                b'/' => {
                    ensure!((1..=31).contains(&a), ComponentOutOfRangeSnafu { field: "day", value: a });
                    ensure!(b <= 23, ComponentOutOfRangeSnafu { field: "hour", value: b });
                    ensure!(c <= 59, ComponentOutOfRangeSnafu { field: "minute", value: c });
                    Timestamp::DHML { day: a as u8, hour: b as u8, minute: c as u8 }
                }
                b'h' => {
                    ensure!(a <= 23, ComponentOutOfRangeSnafu { field: "hour", value: a });
                    ensure!(b <= 59, ComponentOutOfRangeSnafu { field: "minute", value: b });
                    ensure!(c <= 59, ComponentOutOfRangeSnafu { field: "second", value: c });
                    Timestamp::HMS { hour: a as u8, minute: b as u8, second: c as u8 }
                }
                _ => unreachable!(),
            };
            Ok((ts, 7))
        }
        _ => {
            ensure!(bytes.len() >= 8, WrongLengthSnafu { bytes: bytes.to_vec() });
            let candidate = &bytes[0..8];
            if !candidate.iter().all(u8::is_ascii_digit) {
                return Err(TimestampError::UnknownVariant { suffix });
            }
            let d = digits(candidate)?;
            let (month, day, hour, minute) = (two(&d, 0), two(&d, 2), two(&d, 4), two(&d, 6));
            ensure!((1..=12).contains(&month), ComponentOutOfRangeSnafu { field: "month", value: month });
            ensure!((1..=31).contains(&day), ComponentOutOfRangeSnafu { field: "day", value: day });
            ensure!(hour <= 23, ComponentOutOfRangeSnafu { field: "hour", value: hour });
            ensure!(minute <= 59, ComponentOutOfRangeSnafu { field: "minute", value: minute });
            Ok((
                Timestamp::MDHM { month: month as u8, day: day as u8, hour: hour as u8, minute: minute as u8 },
                8,
            ))
        }
    }
}

/// Encode a timestamp back to its wire form (7 or 8 ASCII bytes).
pub fn encode(ts: &Timestamp) -> String {
    match *ts {
        Timestamp::DHMZ { day, hour, minute } => format!("{day:02}{hour:02}{minute:02}z"),
        Timestamp::DHML { day, hour, minute } => format!("{day:02}{hour:02}{minute:02}/"),
        Timestamp::HMS { hour, minute, second } => format!("{hour:02}{minute:02}{second:02}h"),
        Timestamp::MDHM { month, day, hour, minute } => format!("{month:02}{day:02}{hour:02}{minute:02}"),
    }
}
