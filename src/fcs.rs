//! AX.25 frame check sequence: CRC-16-CCITT, X.25 variant.
//!
//! Reflected polynomial 0x8408, initial value 0xFFFF, no final XOR,
//! transmitted little-endian.

use crc::{Algorithm, Crc};

const FCS_ALGORITHM: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0xFFFF,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0x0000,
    residue: 0x0000,
};

const FCS: Crc<u16> = Crc::<u16>::new(&FCS_ALGORITHM);

/// Compute the FCS over `data` (everything from the destination address
/// through the last byte of the information field, exclusive of the FCS
/// itself).
pub fn compute(data: &[u8]) -> u16 {
    FCS.checksum(data)
}

/// Append the little-endian FCS bytes for `data` onto `out`.
pub fn append(data: &[u8], out: &mut Vec<u8>) {
    let fcs = compute(data);
    out.extend_from_slice(&fcs.to_le_bytes());
}

/// Compute the FCS for `data` and compare it against the little-endian
/// `received` bytes (as they appear on the wire).
pub fn matches(data: &[u8], received: [u8; 2]) -> bool {
    compute(data) == u16::from_le_bytes(received)
}
