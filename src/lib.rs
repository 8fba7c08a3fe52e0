//! Bidirectional codec for APRS information fields, AX.25 UI frames, and
//! the APRS-IS textual (TNC2) framing that carries them over TCP.
//!
//! The codec is pure and stateless: every decode/encode is a referentially
//! transparent function over bytes or text. Transports (KISS, APRS-IS TCP)
//! are out of scope; callers hand this crate already-framed bytes/lines.

pub mod ax25;
pub mod base91;
pub mod callsign;
pub mod coordinates;
pub mod dispatch;
pub mod error;
pub mod extension;
pub mod fcs;
pub mod fields;
pub mod frame;
pub mod position;
pub mod timestamp;
pub mod tnc2;
pub mod tracing_init;

pub use ax25::AX25Frame;
pub use callsign::Callsign;
pub use dispatch::InformationField;
pub use error::AprsError;
pub use fields::{ItemReport, Message, ObjectReport, PositionReport, StatusReport};
pub use frame::APRSFrame;
pub use position::Position;
pub use timestamp::Timestamp;
