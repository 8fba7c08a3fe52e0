//! Callsign value type plus AX.25 and TNC2 address encoding.
//!
//! A small value object with explicit constructors that validate the base
//! and SSID at construction; decoders for both wire forms hand back an
//! already-valid `Callsign` or an error, never a half-built one.

use crate::error::{AddressError, InvalidBaseSnafu, MalformedTextSnafu, SsidOutOfRangeSnafu};
use snafu::ensure;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A station callsign: a 1-6 character alphanumeric base plus an optional
/// 0-15 SSID, and (on a digipeater path hop) an H-bit recording whether this
/// hop has repeated the frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Callsign {
    base: String,
    ssid: u8,
    heard: bool,
}

impl Callsign {
    /// Construct a callsign, validating the base and SSID.
    pub fn new(base: &str, ssid: u8, heard: bool) -> Result<Self, AddressError> {
        let base_upper = base.to_ascii_uppercase();
        ensure!(
            !base_upper.is_empty()
                && base_upper.len() <= 6
                && base_upper.chars().all(|c| c.is_ascii_alphanumeric()),
            InvalidBaseSnafu { base: base_upper.clone() }
        );
        ensure!(ssid <= 15, SsidOutOfRangeSnafu { ssid });
        Ok(Self { base: base_upper, ssid, heard })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn ssid(&self) -> u8 {
        self.ssid
    }

    pub fn heard(&self) -> bool {
        self.heard
    }

    pub fn with_heard(&self, heard: bool) -> Self {
        Self { heard, ..self.clone() }
    }

    /// Parse a TNC2 textual callsign: `BASE[-SSID][*]`. A trailing `*` sets
    /// the H-bit (this hop has repeated the frame).
    pub fn decode_textual(text: &str) -> Result<Self, AddressError> {
        let (text, heard) = match text.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (text, false),
        };

        let (base, ssid) = match text.split_once('-') {
            Some((base, ssid_str)) => {
                let ssid: u8 = ssid_str
                    .parse()
                    .map_err(|_| MalformedTextSnafu { text: text.to_string() }.build())?;
                (base, ssid)
            }
            None => (text, 0),
        };

        Self::new(base, ssid, heard)
    }

    /// Render as TNC2 text: `BASE[-SSID][*]`.
    pub fn encode_textual(&self) -> String {
        let mut out = self.base.clone();
        if self.ssid != 0 {
            out.push('-');
            out.push_str(&self.ssid.to_string());
        }
        if self.heard {
            out.push('*');
        }
        out
    }

    /// Decode a 7-byte AX.25 address field. Returns the callsign plus the
    /// extension bit (bit 0 of the final octet): `true` means this is the
    /// last address in the header.
    pub fn decode_ax25(bytes: &[u8]) -> Result<(Self, bool), AddressError> {
        ensure!(
            bytes.len() == 7,
            crate::error::ShortAddressSnafu { bytes: bytes.to_vec() }
        );

        let raw: String = bytes[0..6].iter().map(|&b| (b >> 1) as char).collect();
        let base = raw.trim_end().to_string();

        let ssid_octet = bytes[6];
        let ssid = (ssid_octet >> 1) & 0x0F;
        let heard = ssid_octet & 0x80 != 0;
        let extension_bit = ssid_octet & 0x01 != 0;

        let callsign = Self::new(&base, ssid, heard)?;
        Ok((callsign, extension_bit))
    }

    /// Encode as a 7-byte AX.25 address field. `set_extension_bit` should be
    /// `true` only for the last address in the header (destination, source,
    /// or final digipeater).
    pub fn encode_ax25(&self, set_extension_bit: bool) -> [u8; 7] {
        let mut out = [0u8; 7];
        let mut padded = self.base.clone();
        while padded.len() < 6 {
            padded.push(' ');
        }
        for (i, c) in padded.bytes().take(6).enumerate() {
            out[i] = c << 1;
        }
        let mut ssid_octet = (self.ssid << 1) | 0b0110_0000;
        if self.heard {
            ssid_octet |= 0x80;
        }
        if set_extension_bit {
            ssid_octet |= 0x01;
        }
        out[6] = ssid_octet;
        out
    }
}

impl std::fmt::Display for Callsign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode_textual())
    }
}
