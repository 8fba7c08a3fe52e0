//! AX.25 UI frame codec: addresses, control/PID bytes, information field, FCS.
//!
//! Walks address fields by the extension bit (destination, source, then
//! 0-8 digipeaters), validates the hardcoded UI control/PID pair, and
//! leaves FCS verification as a separate step so a structurally valid
//! frame is never thrown away just because its checksum doesn't match.

use crate::callsign::Callsign;
use crate::error::{BadControlSnafu, BadPidSnafu, DigipeaterPathTooLongSnafu, FrameError, TruncatedSnafu};
use crate::fcs;
use snafu::ensure;
use tracing::instrument;

const CONTROL_UI: u8 = 0x03;
const PID_NO_LAYER3: u8 = 0xF0;
const MAX_DIGIPEATERS: usize = 8;

/// A decoded AX.25 UI frame. Immutable after construction; the FCS is
/// derived on encode and, on decode, kept as the bytes actually observed
/// (if any) so [`verify_fcs`](AX25Frame::verify_fcs) can compare against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AX25Frame {
    pub destination: Callsign,
    pub source: Callsign,
    pub path: Vec<Callsign>,
    pub information: Vec<u8>,
    received_fcs: Option<u16>,
}

impl AX25Frame {
    /// Construct a frame for encoding. `path` may hold 0-8 digipeaters.
    pub fn new(
        destination: Callsign,
        source: Callsign,
        path: Vec<Callsign>,
        information: Vec<u8>,
    ) -> Result<Self, crate::error::EncodingError> {
        ensure!(
            path.len() <= MAX_DIGIPEATERS,
            DigipeaterPathTooLongSnafu { count: path.len() }
        );
        Ok(Self {
            destination,
            source,
            path,
            information,
            received_fcs: None,
        })
    }

    /// Decode an AX.25 UI frame from its on-the-wire byte representation.
    ///
    /// When `with_fcs` is `false` (the frame arrived already unframed by a
    /// KISS layer) the trailing two bytes are not consumed as FCS; instead
    /// the codec computes what the FCS *would* be over the full input.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8], with_fcs: bool) -> Result<Self, FrameError> {
        ensure!(
            bytes.len() >= 14,
            TruncatedSnafu { field: "source address", bytes: bytes.to_vec() }
        );

        let (destination, has_more) = Callsign::decode_ax25(&bytes[0..7])?;
        if !has_more {
            return Err(crate::error::AddressError::MissingExtensionBit {
                bytes: bytes[0..7].to_vec(),
            }
            .into());
        }

        let (source, mut has_more) = Callsign::decode_ax25(&bytes[7..14])?;

        let mut path = Vec::new();
        let mut offset = 14;
        while has_more {
            ensure!(
                path.len() < MAX_DIGIPEATERS,
                crate::error::PathTooLongSnafu
            );
            let field = bytes.get(offset..offset + 7).ok_or_else(|| {
                TruncatedSnafu { field: "digipeater address", bytes: bytes.to_vec() }.build()
            })?;
            let (call, more) = Callsign::decode_ax25(field)?;
            path.push(call);
            has_more = more;
            offset += 7;
        }

        let control = *bytes
            .get(offset)
            .ok_or_else(|| TruncatedSnafu { field: "control byte", bytes: bytes.to_vec() }.build())?;
        ensure!(control == CONTROL_UI, BadControlSnafu { control });
        offset += 1;

        let pid = *bytes
            .get(offset)
            .ok_or_else(|| TruncatedSnafu { field: "PID byte", bytes: bytes.to_vec() }.build())?;
        ensure!(pid == PID_NO_LAYER3, BadPidSnafu { pid });
        offset += 1;

        let (information, received_fcs) = if with_fcs {
            ensure!(
                bytes.len() >= offset + 2,
                TruncatedSnafu { field: "FCS", bytes: bytes.to_vec() }
            );
            let info_end = bytes.len() - 2;
            let info = bytes[offset..info_end].to_vec();
            let fcs_bytes = [bytes[info_end], bytes[info_end + 1]];
            (info, Some(u16::from_le_bytes(fcs_bytes)))
        } else {
            (bytes[offset..].to_vec(), None)
        };

        Ok(Self {
            destination,
            source,
            path,
            information,
            received_fcs,
        })
    }

    /// Encode this frame, including a freshly computed trailing FCS.
    #[instrument(skip(self))]
    pub fn encode(&self) -> Result<Vec<u8>, crate::error::EncodingError> {
        ensure!(
            self.path.len() <= MAX_DIGIPEATERS,
            DigipeaterPathTooLongSnafu { count: self.path.len() }
        );

        let mut out = Vec::with_capacity(14 + self.path.len() * 7 + 2 + self.information.len() + 2);
        let source_or_path_follows = !self.path.is_empty();
        out.extend_from_slice(&self.destination.encode_ax25(false));
        out.extend_from_slice(&self.source.encode_ax25(!source_or_path_follows));

        if let Some((last, rest)) = self.path.split_last() {
            for hop in rest {
                out.extend_from_slice(&hop.encode_ax25(true));
            }
            out.extend_from_slice(&last.encode_ax25(false));
        }

        out.push(CONTROL_UI);
        out.push(PID_NO_LAYER3);
        out.extend_from_slice(&self.information);

        let fcs_value = fcs::compute(&out);
        out.extend_from_slice(&fcs_value.to_le_bytes());

        Ok(out)
    }

    /// Recompute the FCS over this frame's addressing/control/info bytes and
    /// compare it against the FCS observed at decode time, if any.
    ///
    /// Returns `Ok(())` when there was no received FCS to check against
    /// (e.g. the frame came from a KISS layer that already stripped it) or
    /// when it matches; `Err` carries both the computed and received values.
    pub fn verify_fcs(&self) -> Result<(), crate::error::FrameCheckError> {
        let Some(received) = self.received_fcs else {
            return Ok(());
        };
        let computed = fcs::compute(&self.frame_body());
        if computed == received {
            Ok(())
        } else {
            Err(crate::error::FrameCheckError { computed, received })
        }
    }

    fn frame_body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(14 + self.path.len() * 7 + 2 + self.information.len());
        body.extend_from_slice(&self.destination.encode_ax25(false));
        let source_or_path_follows = !self.path.is_empty();
        body.extend_from_slice(&self.source.encode_ax25(!source_or_path_follows));
        if let Some((last, rest)) = self.path.split_last() {
            for hop in rest {
                body.extend_from_slice(&hop.encode_ax25(true));
            }
            body.extend_from_slice(&last.encode_ax25(false));
        }
        body.push(CONTROL_UI);
        body.push(PID_NO_LAYER3);
        body.extend_from_slice(&self.information);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(path: Vec<Callsign>) -> AX25Frame {
        AX25Frame::new(
            Callsign::new("APRS", 0, false).unwrap(),
            Callsign::new("KF7HVM", 2, false).unwrap(),
            path,
            b">Test".to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn round_trip_no_path() {
        let f = frame(vec![]);
        let encoded = f.encode().unwrap();
        let decoded = AX25Frame::decode(&encoded, true).unwrap();
        assert_eq!(decoded.destination, f.destination);
        assert_eq!(decoded.source, f.source);
        assert_eq!(decoded.path, f.path);
        assert_eq!(decoded.information, f.information);
        decoded.verify_fcs().unwrap();
    }

    #[test]
    fn round_trip_with_path() {
        let f = frame(vec![
            Callsign::new("WIDE1", 1, true).unwrap(),
            Callsign::new("WIDE2", 2, false).unwrap(),
        ]);
        let encoded = f.encode().unwrap();
        let decoded = AX25Frame::decode(&encoded, true).unwrap();
        assert_eq!(decoded.path, f.path);
        decoded.verify_fcs().unwrap();
    }

    #[test]
    fn fcs_mismatch_detected_but_structure_preserved() {
        let f = frame(vec![]);
        let mut encoded = f.encode().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;
        let decoded = AX25Frame::decode(&encoded, true).unwrap();
        assert_eq!(decoded.information, f.information);
        assert!(decoded.verify_fcs().is_err());
    }

    #[test]
    fn without_fcs_flag_consumes_all_bytes_as_information() {
        let f = frame(vec![]);
        let encoded = f.encode().unwrap();
        let body_len = encoded.len() - 2;
        let decoded = AX25Frame::decode(&encoded[..body_len], false).unwrap();
        assert_eq!(decoded.information, f.information);
        assert!(decoded.verify_fcs().is_ok());
    }

    #[test]
    fn rejects_bad_control_byte() {
        let f = frame(vec![]);
        let mut encoded = f.encode().unwrap();
        encoded[14] = 0x00;
        assert!(AX25Frame::decode(&encoded, true).is_err());
    }

    #[test]
    fn path_over_eight_rejected_on_construction() {
        let path: Vec<_> = (0..9)
            .map(|i| Callsign::new("WIDE1", i, false).unwrap())
            .collect();
        assert!(AX25Frame::new(
            Callsign::new("APRS", 0, false).unwrap(),
            Callsign::new("KF7HVM", 0, false).unwrap(),
            path,
            vec![],
        )
        .is_err());
    }
}
