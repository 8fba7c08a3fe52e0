//! Information-field dispatch: data-type-identifier routing to a typed
//! variant, with local recovery to `Raw` on a typed-decode failure.

use crate::error::EncodingError;
use crate::fields::{ItemReport, Message, ObjectReport, PositionReport, StatusReport};
use tracing::{instrument, trace};

/// The decoded payload of an AX.25 information field, one variant per
/// recognised data type identifier plus a catch-all `Raw`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InformationField {
    Position(PositionReport),
    Object(ObjectReport),
    Item(ItemReport),
    Message(Message),
    Status(StatusReport),
    /// Any DTI without a typed decoder, or a typed decoder that rejected
    /// its bytes. The original bytes are preserved exactly.
    Raw(Vec<u8>),
}

/// Decode an information field. Never fails: a typed decoder's rejection
/// downgrades to [`InformationField::Raw`] instead of propagating. Only a
/// completely empty field is itself represented as `Raw(vec![])`.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> InformationField {
    let Some(&dti) = bytes.first() else {
        return InformationField::Raw(Vec::new());
    };
    let body = &bytes[1..];

    let typed = match dti {
        b'!' => PositionReport::decode(false, false, body).map(InformationField::Position),
        b'=' => PositionReport::decode(true, false, body).map(InformationField::Position),
        b'/' => PositionReport::decode(false, true, body).map(InformationField::Position),
        b'@' => PositionReport::decode(true, true, body).map(InformationField::Position),
        b';' => ObjectReport::decode(body).map(InformationField::Object),
        b')' => ItemReport::decode(body).map(InformationField::Item),
        b':' => Message::decode(body).map(InformationField::Message),
        b'>' => StatusReport::decode(body).map(InformationField::Status),
        _ => return InformationField::Raw(bytes.to_vec()),
    };

    typed.unwrap_or_else(|err| {
        trace!(?err, dti, "typed information-field decode failed, downgrading to raw");
        InformationField::Raw(bytes.to_vec())
    })
}

/// Encode an information field back to its wire bytes, including the DTI.
/// Fails if a typed body violates one of its encoding invariants (an
/// oversized name, addressee, or text).
pub fn encode(field: &InformationField) -> Result<Vec<u8>, EncodingError> {
    Ok(match field {
        InformationField::Position(report) => {
            let mut out = vec![report.dti()];
            out.extend_from_slice(&report.encode()?);
            out
        }
        InformationField::Object(report) => {
            let mut out = vec![b';'];
            out.extend_from_slice(&report.encode()?);
            out
        }
        InformationField::Item(report) => {
            let mut out = vec![b')'];
            out.extend_from_slice(&report.encode()?);
            out
        }
        InformationField::Message(msg) => {
            let mut out = vec![b':'];
            out.extend_from_slice(&msg.encode()?);
            out
        }
        InformationField::Status(status) => {
            let mut out = vec![b'>'];
            out.extend_from_slice(&status.encode()?);
            out
        }
        InformationField::Raw(bytes) => bytes.clone(),
    })
}
