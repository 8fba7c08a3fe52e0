//! Typed information-field bodies: position, object, item, message, and
//! status reports.

use crate::error::{
    AddresseeTooLongSnafu, EncodingError, InformationFieldError, InvalidItemNameSnafu, InvalidLivenessSnafu,
    ItemNameOutOfRangeSnafu, MessageTextTooLongSnafu, MissingMessageDelimiterSnafu, ObjectNameTooLongSnafu,
    StatusTextTooLongSnafu, TruncatedSnafu,
};
use crate::extension::DataExtension;
use crate::position::{self, Position};
use crate::timestamp::{self, Timestamp};
use snafu::ensure;

/// Maximum message text length in bytes.
const MESSAGE_TEXT_MAX: usize = 67;
/// Maximum status text length in bytes.
const STATUS_TEXT_MAX: usize = 62;

/// `!`/`=`/`/`/`@` — a station's own position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionReport {
    pub messaging_capable: bool,
    pub timestamp: Option<Timestamp>,
    pub position: Position,
    pub comment: Vec<u8>,
}

/// `;` — a third-party station or marker, named and independently
/// live/killed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectReport {
    /// Always exactly 9 characters, space-padded.
    pub name: String,
    pub live: bool,
    pub timestamp: Timestamp,
    pub position: Position,
    pub comment: Vec<u8>,
}

/// `)` — like an object but with an unpadded 3-9 character name and no
/// timestamp.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemReport {
    pub name: String,
    pub live: bool,
    pub position: Position,
    pub comment: Vec<u8>,
}

/// `:` — a directed text message, acknowledgement, or rejection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Always exactly 9 characters, space-padded.
    pub addressee: String,
    pub text: Vec<u8>,
    pub message_number: Option<String>,
    pub ack: Option<String>,
    pub rej: Option<String>,
}

/// `>` — free text, optionally timestamped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusReport {
    pub timestamp: Option<Timestamp>,
    pub text: Vec<u8>,
}

fn split_extension_and_altitude(comment: &[u8]) -> (Option<DataExtension>, Option<i32>, Vec<u8>) {
    let (extension, rest) = position::consume_extension(comment);
    let (altitude, rest) = position::lift_altitude(&rest);
    (extension, altitude, rest)
}

/// Inverse of [`split_extension_and_altitude`]: re-adds the extension
/// prefix and, for an uncompressed position, the `/A=dddddd` altitude
/// marker lifted out of the comment on decode.
fn reassemble_comment(position: &Position, comment: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    if let Some(ext) = &position.extension {
        out.extend_from_slice(crate::extension::encode(ext).as_bytes());
    }
    out.extend_from_slice(&position::append_altitude(comment, position.altitude, position.compressed));
    out
}

impl PositionReport {
    pub fn decode(messaging_capable: bool, has_timestamp: bool, bytes: &[u8]) -> Result<Self, InformationFieldError> {
        let mut offset = 0;
        let timestamp = if has_timestamp {
            let (ts, consumed) = timestamp::decode(bytes)?;
            offset += consumed;
            Some(ts)
        } else {
            None
        };

        let (mut position, consumed) = position::decode(&bytes[offset..])?;
        offset += consumed;

        let (extension, altitude, comment) = split_extension_and_altitude(&bytes[offset..]);
        if position.extension.is_none() {
            position.extension = extension;
        }
        if position.altitude.is_none() {
            position.altitude = altitude;
        }

        Ok(Self { messaging_capable, timestamp, position, comment })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let mut out = Vec::new();
        if let Some(ts) = &self.timestamp {
            out.extend_from_slice(timestamp::encode(ts).as_bytes());
        }
        out.extend_from_slice(&position::encode(&self.position));
        out.extend_from_slice(&reassemble_comment(&self.position, &self.comment));
        Ok(out)
    }

    /// The DTI byte this report would be encoded under.
    pub fn dti(&self) -> u8 {
        match (self.timestamp.is_some(), self.messaging_capable) {
            (false, false) => b'!',
            (false, true) => b'=',
            (true, false) => b'/',
            (true, true) => b'@',
        }
    }
}

impl ObjectReport {
    pub fn decode(bytes: &[u8]) -> Result<Self, InformationFieldError> {
        ensure!(bytes.len() >= 10, TruncatedSnafu { field: "object name/liveness", bytes: bytes.to_vec() });
        let name = String::from_utf8_lossy(&bytes[0..9]).into_owned();
        let liveness = bytes[9];
        let live = match liveness {
            b'*' => true,
            b'_' => false,
            _ => return Err(InvalidLivenessSnafu { byte: liveness }.build()),
        };

        let rest = &bytes[10..];
        let (timestamp, consumed) = timestamp::decode(rest)?;
        let (mut position, pos_consumed) = position::decode(&rest[consumed..])?;

        let (extension, altitude, comment) = split_extension_and_altitude(&rest[consumed + pos_consumed..]);
        position.extension = position.extension.or(extension);
        position.altitude = position.altitude.or(altitude);

        Ok(Self { name, live, timestamp, position, comment })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let len = self.name.len();
        ensure!(len <= 9, ObjectNameTooLongSnafu { len, name: self.name.clone() });
        let mut name = self.name.clone();
        while name.len() < 9 {
            name.push(' ');
        }

        let mut out = Vec::new();
        out.extend_from_slice(name.as_bytes());
        out.push(if self.live { b'*' } else { b'_' });
        out.extend_from_slice(timestamp::encode(&self.timestamp).as_bytes());
        out.extend_from_slice(&position::encode(&self.position));
        out.extend_from_slice(&reassemble_comment(&self.position, &self.comment));
        Ok(out)
    }
}

impl ItemReport {
    pub fn decode(bytes: &[u8]) -> Result<Self, InformationFieldError> {
        let terminator_pos = bytes
            .iter()
            .position(|&b| b == b'!' || b == b'_')
            .ok_or_else(|| InvalidItemNameSnafu { len: bytes.len(), bytes: bytes.to_vec() }.build())?;
        ensure!(
            (3..=9).contains(&terminator_pos),
            InvalidItemNameSnafu { len: terminator_pos, bytes: bytes.to_vec() }
        );

        let name = String::from_utf8_lossy(&bytes[0..terminator_pos]).into_owned();
        let live = bytes[terminator_pos] == b'!';

        let rest = &bytes[terminator_pos + 1..];
        let (mut position, consumed) = position::decode(rest)?;
        let (extension, altitude, comment) = split_extension_and_altitude(&rest[consumed..]);
        position.extension = position.extension.or(extension);
        position.altitude = position.altitude.or(altitude);

        Ok(Self { name, live, position, comment })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let len = self.name.len();
        ensure!((3..=9).contains(&len), ItemNameOutOfRangeSnafu { len, name: self.name.clone() });

        let mut out = Vec::new();
        out.extend_from_slice(self.name.as_bytes());
        out.push(if self.live { b'!' } else { b'_' });
        out.extend_from_slice(&position::encode(&self.position));
        out.extend_from_slice(&reassemble_comment(&self.position, &self.comment));
        Ok(out)
    }
}

impl Message {
    pub fn decode(bytes: &[u8]) -> Result<Self, InformationFieldError> {
        ensure!(bytes.len() >= 10, MissingMessageDelimiterSnafu { bytes: bytes.to_vec() });
        ensure!(bytes[9] == b':', MissingMessageDelimiterSnafu { bytes: bytes.to_vec() });

        let addressee = String::from_utf8_lossy(&bytes[0..9]).into_owned();
        let body = &bytes[10..];

        let (text_part, message_number) = match body.iter().position(|&b| b == b'{') {
            Some(pos) => (&body[0..pos], Some(String::from_utf8_lossy(&body[pos + 1..]).into_owned())),
            None => (body, None),
        };

        let text_str = String::from_utf8_lossy(text_part);
        let (ack, rej) = if let Some(num) = text_str.strip_prefix("ack") {
            (Some(num.to_string()), None)
        } else if let Some(num) = text_str.strip_prefix("rej") {
            (None, Some(num.to_string()))
        } else {
            (None, None)
        };

        Ok(Self {
            addressee,
            text: text_part.to_vec(),
            message_number,
            ack,
            rej,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let addr_len = self.addressee.len();
        ensure!(addr_len <= 9, AddresseeTooLongSnafu { len: addr_len, addressee: self.addressee.clone() });
        ensure!(
            self.text.len() <= MESSAGE_TEXT_MAX,
            MessageTextTooLongSnafu { len: self.text.len(), max: MESSAGE_TEXT_MAX }
        );

        let mut addressee = self.addressee.clone();
        while addressee.len() < 9 {
            addressee.push(' ');
        }

        let mut out = Vec::new();
        out.extend_from_slice(addressee.as_bytes());
        out.push(b':');
        out.extend_from_slice(&self.text);
        if let Some(num) = &self.message_number {
            out.push(b'{');
            out.extend_from_slice(num.as_bytes());
        }
        Ok(out)
    }
}

impl StatusReport {
    pub fn decode(bytes: &[u8]) -> Result<Self, InformationFieldError> {
        let has_timestamp = bytes.len() >= 7 && bytes[6] == b'z' && bytes[0..6].iter().all(u8::is_ascii_digit);
        if has_timestamp {
            let (ts, _) = timestamp::decode(&bytes[0..7])?;
            Ok(Self { timestamp: Some(ts), text: bytes[7..].to_vec() })
        } else {
            Ok(Self { timestamp: None, text: bytes.to_vec() })
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        ensure!(
            self.text.len() <= STATUS_TEXT_MAX,
            StatusTextTooLongSnafu { len: self.text.len(), max: STATUS_TEXT_MAX }
        );

        let mut out = Vec::new();
        if let Some(ts) = &self.timestamp {
            out.extend_from_slice(timestamp::encode(ts).as_bytes());
        }
        out.extend_from_slice(&self.text);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_report_with_timestamp() {
        let report = PositionReport::decode(false, true, b"092345z4903.50N/07201.75W>Test").unwrap();
        assert_eq!(report.timestamp, Some(Timestamp::DHMZ { day: 9, hour: 23, minute: 45 }));
        assert_eq!(report.comment, b"Test");
        assert_eq!(report.position.symbol_code, '>');
    }

    #[test]
    fn object_report_live_with_timestamp() {
        let report = ObjectReport::decode(b"LEADER   *092345z4903.50N/07201.75W>Moving").unwrap();
        assert_eq!(report.name, "LEADER   ");
        assert!(report.live);
        assert_eq!(report.timestamp, Timestamp::DHMZ { day: 9, hour: 23, minute: 45 });
        assert_eq!(report.comment, b"Moving");
    }

    #[test]
    fn message_with_number() {
        let msg = Message::decode(b"KF7HVM   :Hello{001").unwrap();
        assert_eq!(msg.addressee, "KF7HVM   ");
        assert_eq!(msg.text, b"Hello");
        assert_eq!(msg.message_number, Some("001".to_string()));
    }

    #[test]
    fn message_round_trip_preserves_padded_addressee() {
        let bytes = b"KF7HVM   :Hello{001";
        let msg = Message::decode(bytes).unwrap();
        assert_eq!(msg.encode().unwrap(), bytes);
    }

    #[test]
    fn message_ack() {
        let msg = Message::decode(b"KF7HVM   :ack001").unwrap();
        assert_eq!(msg.ack, Some("001".to_string()));
    }

    #[test]
    fn status_report_with_timestamp() {
        let status = StatusReport::decode(b"092345zOK").unwrap();
        assert_eq!(status.timestamp, Some(Timestamp::DHMZ { day: 9, hour: 23, minute: 45 }));
        assert_eq!(status.text, b"OK");
    }

    #[test]
    fn status_report_without_timestamp() {
        let status = StatusReport::decode(b"Net Control Station").unwrap();
        assert_eq!(status.timestamp, None);
        assert_eq!(status.text, b"Net Control Station");
    }

    #[test]
    fn item_report_round_trip() {
        let item = ItemReport::decode(b"MOBIL!4903.50N/07201.75W>Rolling").unwrap();
        assert_eq!(item.name, "MOBIL");
        assert!(item.live);
        let encoded = item.encode().unwrap();
        let reparsed = ItemReport::decode(&encoded).unwrap();
        assert_eq!(reparsed, item);
    }

    #[test]
    fn position_report_round_trips_altitude_marker() {
        let report = PositionReport::decode(false, false, b"4903.50N/07201.75W>hi /A=003054 there").unwrap();
        assert_eq!(report.position.altitude, Some(3054));
        let encoded = report.encode().unwrap();
        let reparsed = PositionReport::decode(false, false, &encoded).unwrap();
        assert_eq!(reparsed.position.altitude, Some(3054));
    }

    #[test]
    fn object_encode_rejects_oversized_name() {
        let report = ObjectReport {
            name: "TOOLONGNAME".to_string(),
            live: true,
            timestamp: Timestamp::DHMZ { day: 9, hour: 23, minute: 45 },
            position: PositionReport::decode(false, false, b"4903.50N/07201.75W>").unwrap().position,
            comment: Vec::new(),
        };
        assert!(report.encode().is_err());
    }

    #[test]
    fn item_encode_rejects_out_of_range_name() {
        let item = ItemReport {
            name: "AB".to_string(),
            live: true,
            position: PositionReport::decode(false, false, b"4903.50N/07201.75W>").unwrap().position,
            comment: Vec::new(),
        };
        assert!(item.encode().is_err());
    }

    #[test]
    fn message_encode_rejects_oversized_addressee() {
        let msg = Message {
            addressee: "TOOLONGADDR".to_string(),
            text: b"hi".to_vec(),
            message_number: None,
            ack: None,
            rej: None,
        };
        assert!(msg.encode().is_err());
    }

    #[test]
    fn message_encode_rejects_oversized_text() {
        let msg = Message {
            addressee: "KF7HVM".to_string(),
            text: vec![b'x'; MESSAGE_TEXT_MAX + 1],
            message_number: None,
            ack: None,
            rej: None,
        };
        assert!(msg.encode().is_err());
    }

    #[test]
    fn status_encode_rejects_oversized_text() {
        let status = StatusReport { timestamp: None, text: vec![b'x'; STATUS_TEXT_MAX + 1] };
        assert!(status.encode().is_err());
    }
}
