//! Two Base32 alphabets: RFC-4648 and a "spell-safe" alphabet that drops
//! characters easily confused with one another when read aloud.
//!
//! Both alphabets share the same 5-bit packing; only the character table
//! and the decode lookup differ, so the packing logic lives once in
//! [`encode_with`]/[`decode_with`] and each public alphabet is a thin
//! wrapper around it.

use crate::error::{Error, Result};

const RFC4648_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Deliberately excludes vowels, `B` (confusable with `8`), `S` (with
/// `5`), `O`/`Q` (with `0`), the `{1, I, L}` group, `R` (with `P`), and
/// `U`/`W` (with `V`).
const SPELL_SAFE_ALPHABET: &[u8; 32] = b"23456789CDGHJKNPTVXZcdghjkntpvxz";

fn rfc4648_value(c: u8) -> Option<u8> {
    match c {
        b'A'..=b'Z' => Some(c - b'A'),
        b'2'..=b'7' => Some(c - b'2' + 26),
        _ => None,
    }
}

fn spell_safe_value(c: u8) -> Option<u8> {
    SPELL_SAFE_ALPHABET
        .iter()
        .position(|&a| a == c)
        .map(|i| i as u8)
}

fn encode_with(alphabet: &[u8; 32], data: &[u8], padded: bool) -> String {
    let mut out = Vec::with_capacity((data.len() * 8).div_ceil(5));
    let mut bitbuf: u64 = 0;
    let mut bits_in_buf: u32 = 0;

    for &byte in data {
        bitbuf = (bitbuf << 8) | byte as u64;
        bits_in_buf += 8;
        while bits_in_buf >= 5 {
            bits_in_buf -= 5;
            let idx = ((bitbuf >> bits_in_buf) & 0x1F) as usize;
            out.push(alphabet[idx]);
        }
    }
    if bits_in_buf > 0 {
        let idx = ((bitbuf << (5 - bits_in_buf)) & 0x1F) as usize;
        out.push(alphabet[idx]);
    }

    if padded {
        while out.len() % 8 != 0 {
            out.push(b'=');
        }
    }

    // Safe: every byte pushed above came from `alphabet` or `b'='`, both ASCII.
    String::from_utf8(out).expect("base32 alphabet is ASCII")
}

fn decode_with(value_of: impl Fn(u8) -> Option<u8>, s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = s.as_bytes();
    let pad_start = bytes
        .iter()
        .position(|&b| b == b'=')
        .unwrap_or(bytes.len());
    let data = &bytes[..pad_start];
    let had_padding = pad_start < bytes.len();

    let core_len = data.len();
    if matches!(core_len % 8, 1 | 3 | 6) {
        return Err(Error::argument(format!(
            "base32 input has an invalid length ({core_len} data characters)"
        )));
    }
    if had_padding && bytes.len() % 8 != 0 {
        return Err(Error::argument(
            "padded base32 input length is not a multiple of 8",
        ));
    }

    let mut out = Vec::with_capacity(core_len * 5 / 8);
    let mut bitbuf: u64 = 0;
    let mut bits_in_buf: u32 = 0;

    for &c in data {
        let val = value_of(c)
            .ok_or_else(|| Error::argument(format!("invalid base32 character {:?}", c as char)))?;
        bitbuf = (bitbuf << 5) | val as u64;
        bits_in_buf += 5;
        if bits_in_buf >= 8 {
            bits_in_buf -= 8;
            out.push(((bitbuf >> bits_in_buf) & 0xFF) as u8);
        }
    }

    Ok(out)
}

/// RFC-4648 Base32 encode, `"AB..Z2..7"` alphabet.
#[must_use]
pub fn encode_rfc4648(data: &[u8], padded: bool) -> String {
    encode_with(RFC4648_ALPHABET, data, padded)
}

/// RFC-4648 Base32 decode. Accepts padded or unpadded input.
pub fn decode_rfc4648(s: &str) -> Result<Vec<u8>> {
    decode_with(rfc4648_value, s)
}

/// Spell-safe Base32 encode.
#[must_use]
pub fn encode_spell_safe(data: &[u8], padded: bool) -> String {
    encode_with(SPELL_SAFE_ALPHABET, data, padded)
}

/// Spell-safe Base32 decode. Accepts padded or unpadded input.
pub fn decode_spell_safe(s: &str) -> Result<Vec<u8>> {
    decode_with(spell_safe_value, s)
}
