//! Canonical 1..4-byte length prefix for non-negative integers in
//! `[0, 1_077_952_575]`.
//!
//! The top two bits of the first byte hold the byte count minus one; the
//! remaining bits, big-endian across the whole prefix, hold the integer
//! minus the base of its range. Ranges are disjoint, so every integer has
//! exactly one representation and every syntactically valid 1..4-byte
//! prefix decodes to exactly one integer.

use crate::error::{Error, Result};

const RANGE_1_MAX: u32 = 63;
const RANGE_2_BASE: u32 = 64;
const RANGE_2_MAX: u32 = 16_447;
const RANGE_3_BASE: u32 = 16_448;
const RANGE_3_MAX: u32 = 4_210_751;
const RANGE_4_BASE: u32 = 4_210_752;
const RANGE_4_MAX: u32 = 1_077_952_575;

/// Encode `n` as its canonical 1..4-byte packed representation.
pub fn encode(n: u32) -> Result<Vec<u8>> {
    match n {
        0..=RANGE_1_MAX => Ok(vec![n as u8]),
        RANGE_2_BASE..=RANGE_2_MAX => {
            let v = n - RANGE_2_BASE;
            Ok(vec![0b0100_0000 | ((v >> 8) as u8), (v & 0xFF) as u8])
        }
        RANGE_3_BASE..=RANGE_3_MAX => {
            let v = n - RANGE_3_BASE;
            Ok(vec![
                0b1000_0000 | ((v >> 16) as u8),
                ((v >> 8) & 0xFF) as u8,
                (v & 0xFF) as u8,
            ])
        }
        RANGE_4_BASE..=RANGE_4_MAX => {
            let v = n - RANGE_4_BASE;
            Ok(vec![
                0b1100_0000 | ((v >> 24) as u8),
                ((v >> 16) & 0xFF) as u8,
                ((v >> 8) & 0xFF) as u8,
                (v & 0xFF) as u8,
            ])
        }
        _ => Err(Error::argument(format!(
            "packed integer {n} is out of range [0, {RANGE_4_MAX}]"
        ))),
    }
}

/// Number of bytes a packed prefix starting with `first_byte` occupies.
#[must_use]
pub fn expected_length(first_byte: u8) -> usize {
    (((first_byte >> 6) & 0x3) + 1) as usize
}

/// Decode a packed integer from exactly `expected_length(bytes[0])` bytes.
pub fn decode(bytes: &[u8]) -> Result<u32> {
    if bytes.is_empty() {
        return Err(Error::argument("packed integer prefix is empty"));
    }
    let needed = expected_length(bytes[0]);
    if bytes.len() != needed {
        return Err(Error::argument(format!(
            "packed integer prefix needs {needed} bytes, got {}",
            bytes.len()
        )));
    }

    let value = match needed {
        1 => bytes[0] as u32,
        2 => {
            let v = (((bytes[0] & 0x3F) as u32) << 8) | bytes[1] as u32;
            RANGE_2_BASE + v
        }
        3 => {
            let v = (((bytes[0] & 0x3F) as u32) << 16)
                | ((bytes[1] as u32) << 8)
                | bytes[2] as u32;
            RANGE_3_BASE + v
        }
        4 => {
            let v = (((bytes[0] & 0x3F) as u32) << 24)
                | ((bytes[1] as u32) << 16)
                | ((bytes[2] as u32) << 8)
                | bytes[3] as u32;
            RANGE_4_BASE + v
        }
        _ => unreachable!("expected_length only ever returns 1..=4"),
    };

    Ok(value)
}

/// Decode a packed integer starting at `offset` inside a larger buffer,
/// returning the decoded value and the number of bytes it occupied.
pub fn decode_at(buf: &[u8], offset: usize) -> Result<(u32, usize)> {
    if offset >= buf.len() {
        return Err(Error::argument("packed integer offset out of bounds"));
    }
    let needed = expected_length(buf[offset]);
    if offset + needed > buf.len() {
        return Err(Error::argument(
            "packed integer prefix runs past end of buffer",
        ));
    }
    let value = decode(&buf[offset..offset + needed])?;
    Ok((value, needed))
}
