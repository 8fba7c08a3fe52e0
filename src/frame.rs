//! The top-level facade: an `APRSFrame` decodable from either AX.25 bytes
//! or a TNC2 text line, and re-encodable in either shape.

use crate::ax25::AX25Frame;
use crate::callsign::Callsign;
use crate::dispatch::{self, InformationField};
use crate::error::AprsError;
use crate::tnc2::{self, Tnc2Line};
use tracing::instrument;

/// A fully decoded APRS frame: addressing plus a typed information field.
#[derive(Debug, Clone, PartialEq)]
pub struct APRSFrame {
    pub source: Callsign,
    pub destination: Callsign,
    pub path: Vec<Callsign>,
    pub information: InformationField,
}

impl APRSFrame {
    /// Decode from an AX.25 UI frame's on-the-wire bytes. Structural
    /// (address/frame) failures are surfaced; a typed information-field
    /// decode failure downgrades to [`InformationField::Raw`].
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode_ax25(bytes: &[u8], with_fcs: bool) -> Result<Self, AprsError> {
        let frame = AX25Frame::decode(bytes, with_fcs)?;
        let information = dispatch::decode(&frame.information);
        Ok(Self {
            source: frame.source,
            destination: frame.destination,
            path: frame.path,
            information,
        })
    }

    /// Decode from a TNC2 text line (trailing CRLF/LF already stripped).
    /// Returns `Ok(None)` for a server comment line (it carries no frame).
    #[instrument(skip(line))]
    pub fn decode_tnc2(line: &str) -> Result<Option<Self>, AprsError> {
        match tnc2::decode(line)? {
            Tnc2Line::Comment(_) => Ok(None),
            Tnc2Line::Frame { source, destination, path, information } => {
                let information = dispatch::decode(&information);
                Ok(Some(Self { source, destination, path, information }))
            }
        }
    }

    /// Encode to AX.25 UI frame bytes, including a freshly computed FCS.
    pub fn encode_ax25(&self) -> Result<Vec<u8>, AprsError> {
        let frame = AX25Frame::new(
            self.destination.clone(),
            self.source.clone(),
            self.path.clone(),
            dispatch::encode(&self.information)?,
        )?;
        Ok(frame.encode()?)
    }

    /// Encode to a TNC2 text line (without a trailing CRLF). Fails if the
    /// information field violates one of its encoding invariants.
    pub fn encode_tnc2(&self) -> Result<String, AprsError> {
        let line = Tnc2Line::Frame {
            source: self.source.clone(),
            destination: self.destination.clone(),
            path: self.path.clone(),
            information: dispatch::encode(&self.information)?,
        };
        Ok(tnc2::encode(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_tnc2_uncompressed_position() {
        let line = "KF7HVM-2>APRS:/092345z4903.50N/07201.75W>Test";
        let frame = APRSFrame::decode_tnc2(line).unwrap().unwrap();
        assert!(matches!(frame.information, InformationField::Position(_)));
        assert_eq!(frame.source.encode_textual(), "KF7HVM-2");
    }

    #[test]
    fn decode_tnc2_comment_returns_none() {
        assert_eq!(APRSFrame::decode_tnc2("# javAPRSSrvr 4.1.8").unwrap(), None);
    }

    #[test]
    fn round_trip_tnc2() {
        let line = "KF7HVM-2>APRS:!4903.50N/07201.75W>Test";
        let frame = APRSFrame::decode_tnc2(line).unwrap().unwrap();
        assert_eq!(frame.encode_tnc2().unwrap(), line);
    }

    #[test]
    fn ax25_round_trip() {
        let destination = Callsign::new("APRS", 0, false).unwrap();
        let source = Callsign::new("KF7HVM", 2, false).unwrap();
        let original = APRSFrame {
            source,
            destination,
            path: vec![],
            information: dispatch::decode(b">Test"),
        };
        let encoded = original.encode_ax25().unwrap();
        let decoded = APRSFrame::decode_ax25(&encoded, true).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn cross_form_equivalence() {
        let destination = Callsign::new("APRS", 0, false).unwrap();
        let source = Callsign::new("KF7HVM", 2, false).unwrap();
        let frame = APRSFrame {
            source,
            destination,
            path: vec![],
            information: dispatch::decode(b"!4903.50N/07201.75W>Test"),
        };
        let ax25_bytes = frame.encode_ax25().unwrap();
        let tnc2_text = frame.encode_tnc2().unwrap();

        let from_ax25 = APRSFrame::decode_ax25(&ax25_bytes, true).unwrap();
        let from_tnc2 = APRSFrame::decode_tnc2(&tnc2_text).unwrap().unwrap();
        assert_eq!(from_ax25.source, from_tnc2.source);
        assert_eq!(from_ax25.destination, from_tnc2.destination);
        assert_eq!(from_ax25.information, from_tnc2.information);
    }

    #[test]
    fn telemetry_dispatches_to_raw() {
        let destination = Callsign::new("APRS", 0, false).unwrap();
        let source = Callsign::new("N0CALL", 0, false).unwrap();
        let bytes = b"T#471,7.5,34.7,37.0,1.0,137.0,00000000";
        let frame = APRSFrame {
            source,
            destination,
            path: vec![],
            information: dispatch::decode(bytes),
        };
        assert_eq!(frame.information, InformationField::Raw(bytes.to_vec()));
    }
}
