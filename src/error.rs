//! Error taxonomy for the APRS codec.
//!
//! Every variant carries the offending bytes so a caller can log or retry
//! without re-deriving context from a stack trace (there isn't one).

use snafu::Snafu;

/// A malformed callsign or AX.25 address block.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[snafu(visibility(pub))]
pub enum AddressError {
    #[snafu(display("callsign base must be 1-6 upper alphanumerics: {base:?}"))]
    InvalidBase { base: String },

    #[snafu(display("SSID {ssid} out of range 0-15"))]
    SsidOutOfRange { ssid: u8 },

    #[snafu(display("address field is not 7 bytes: {bytes:?}"))]
    ShortAddress { bytes: Vec<u8> },

    #[snafu(display("address extension bit missing where required: {bytes:?}"))]
    MissingExtensionBit { bytes: Vec<u8> },

    #[snafu(display("textual address malformed: {text:?}"))]
    MalformedText { text: String },
}

/// An AX.25 structural violation.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[snafu(visibility(pub))]
pub enum FrameError {
    #[snafu(display("frame truncated before {field}: {bytes:?}"))]
    Truncated { field: &'static str, bytes: Vec<u8> },

    #[snafu(display("control byte {control:#04x} != 0x03 (UI)"))]
    BadControl { control: u8 },

    #[snafu(display("PID byte {pid:#04x} != 0xF0"))]
    BadPid { pid: u8 },

    #[snafu(display("more than 8 digipeater addresses in path"))]
    PathTooLong,

    #[snafu(context(false))]
    Address { source: AddressError },
}

/// FCS (frame check sequence) mismatch. The structurally decoded frame is
/// still handed back to the caller alongside this error.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[snafu(display("FCS mismatch: computed {computed:#06x}, received {received:#06x}"))]
pub struct FrameCheckError {
    pub computed: u16,
    pub received: u16,
}

/// Out-of-range timestamp components or an unrecognised variant suffix.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[snafu(visibility(pub))]
pub enum TimestampError {
    #[snafu(display("timestamp field is not 7 bytes: {bytes:?}"))]
    WrongLength { bytes: Vec<u8> },

    #[snafu(display("unrecognised timestamp suffix byte {suffix:#04x}"))]
    UnknownVariant { suffix: u8 },

    #[snafu(display("timestamp component out of range: {field}={value}"))]
    ComponentOutOfRange { field: &'static str, value: u32 },

    #[snafu(display("non-digit byte in timestamp: {bytes:?}"))]
    NonDigit { bytes: Vec<u8> },
}

/// Latitude/longitude out of range, malformed compressed position, or
/// inconsistent ambiguity masking.
#[derive(Debug, Snafu, PartialEq, Clone)]
#[snafu(visibility(pub))]
pub enum PositionError {
    #[snafu(display("latitude {value} out of range [-90, 90]"))]
    LatitudeOutOfRange { value: f64 },

    #[snafu(display("longitude {value} out of range [-180, 180]"))]
    LongitudeOutOfRange { value: f64 },

    #[snafu(display("position block is not the expected length: {bytes:?}"))]
    WrongLength { bytes: Vec<u8> },

    #[snafu(display("ambiguity masking inconsistent between latitude and longitude: {bytes:?}"))]
    InconsistentAmbiguity { bytes: Vec<u8> },

    #[snafu(display("non-digit, non-space byte at position {offset} in {bytes:?}"))]
    MalformedDigits { bytes: Vec<u8>, offset: usize },

    #[snafu(display("unrecognised position-block shape: {bytes:?}"))]
    UnknownShape { bytes: Vec<u8> },
}

/// A typed information-field decoder rejected its bytes. The dispatcher
/// recovers from this by downgrading to the `Raw` variant; it is only ever
/// surfaced directly when a caller invokes a typed decoder on its own.
#[derive(Debug, Snafu, PartialEq, Clone)]
#[snafu(visibility(pub))]
pub enum InformationFieldError {
    #[snafu(display("empty information field"))]
    Empty,

    #[snafu(display("unexpected data type identifier {dti:#04x} for this decoder"))]
    WrongDti { dti: u8 },

    #[snafu(context(false))]
    Timestamp { source: TimestampError },

    #[snafu(context(false))]
    Position { source: PositionError },

    #[snafu(display("field truncated before {field}: {bytes:?}"))]
    Truncated { field: &'static str, bytes: Vec<u8> },

    #[snafu(display("message addressee/body missing second ':' delimiter: {bytes:?}"))]
    MissingMessageDelimiter { bytes: Vec<u8> },

    #[snafu(display("item name must be 3-9 characters, got {len}: {bytes:?}"))]
    InvalidItemName { len: usize, bytes: Vec<u8> },

    #[snafu(display("unrecognised liveness byte {byte:#04x}"))]
    InvalidLiveness { byte: u8 },
}

/// Encode was asked to emit a value that violates an invariant.
#[derive(Debug, Snafu, PartialEq, Clone)]
#[snafu(visibility(pub))]
pub enum EncodingError {
    #[snafu(display("object name must be <= 9 characters, got {len}: {name:?}"))]
    ObjectNameTooLong { len: usize, name: String },

    #[snafu(display("item name must be 3-9 characters, got {len}: {name:?}"))]
    ItemNameOutOfRange { len: usize, name: String },

    #[snafu(display("message addressee must be <= 9 characters, got {len}: {addressee:?}"))]
    AddresseeTooLong { len: usize, addressee: String },

    #[snafu(display("message text too long: {len} bytes (max {max})"))]
    MessageTextTooLong { len: usize, max: usize },

    #[snafu(display("status text too long: {len} bytes (max {max})"))]
    StatusTextTooLong { len: usize, max: usize },

    #[snafu(context(false))]
    Position { source: PositionError },

    #[snafu(context(false))]
    Address { source: AddressError },

    #[snafu(display("digipeater path has {count} entries, max is 8"))]
    DigipeaterPathTooLong { count: usize },
}

/// Unifying error for the [`crate::frame`] facade, where any layer of the
/// stack may fail.
#[derive(Debug, Snafu, PartialEq, Clone)]
#[snafu(visibility(pub))]
pub enum AprsError {
    #[snafu(context(false))]
    Address { source: AddressError },

    #[snafu(context(false))]
    Frame { source: FrameError },

    #[snafu(context(false))]
    FrameCheck { source: FrameCheckError },

    #[snafu(context(false))]
    Encoding { source: EncodingError },

    #[snafu(display("TNC2 line malformed: {line:?}"))]
    MalformedLine { line: String },
}
