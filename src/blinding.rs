//! Length-hiding blinding transform.
//!
//! Wraps a payload with random prefix/postfix bytes of randomized length
//! so the wrapped length reveals no useful bound on the payload length,
//! while carrying the true payload length in-band via the packed integer
//! codec so [`unwrap`] can recover it exactly.

use crate::error::{Error, Result};
use crate::packed;
use crate::rng::SecureRandom;

const MIN_TOTAL_LEN_MAX: usize = 256;
const SIDE_RANDOM_MAX: u8 = 15;

/// Wrap `payload` so the result is at least `min_total_len` bytes long
/// (when possible within the 4-bit-per-side random budget's adaptation
/// rule below).
pub fn wrap(payload: &[u8], min_total_len: usize, rng: &mut impl SecureRandom) -> Result<Vec<u8>> {
    if min_total_len > MIN_TOTAL_LEN_MAX {
        return Err(Error::argument(format!(
            "blinding minimum length {min_total_len} exceeds the maximum of {MIN_TOTAL_LEN_MAX}"
        )));
    }

    let mut packed_length = packed::encode(payload.len() as u32)?;

    let mut prefix_len = (rng.random_byte() & 0x0F) as usize;
    let mut postfix_len = (rng.random_byte() & 0x0F) as usize;
    debug_assert!(prefix_len <= SIDE_RANDOM_MAX as usize);
    debug_assert!(postfix_len <= SIDE_RANDOM_MAX as usize);

    let h = 2 + packed_length.len() + prefix_len + payload.len() + postfix_len;
    if h < min_total_len {
        let diff = min_total_len - h;
        let half = diff / 2;
        prefix_len += half;
        postfix_len += half;
        if diff % 2 != 0 {
            if diff & 0b10 != 0 {
                prefix_len += 1;
            } else {
                postfix_len += 1;
            }
        }
    }

    let mut prefix_random = rng.random_vec(prefix_len);
    let mut postfix_random = rng.random_vec(postfix_len);

    let mut out = Vec::with_capacity(2 + packed_length.len() + prefix_len + payload.len() + postfix_len);
    out.push(prefix_len as u8);
    out.push(postfix_len as u8);
    out.extend_from_slice(&packed_length);
    out.extend_from_slice(&prefix_random);
    out.extend_from_slice(payload);
    out.extend_from_slice(&postfix_random);

    use zeroize::Zeroize;
    packed_length.zeroize();
    prefix_random.zeroize();
    postfix_random.zeroize();

    Ok(out)
}

/// Recover the payload from a blinded wrapper produced by [`wrap`].
pub fn unwrap(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 3 {
        return Err(Error::data_integrity("invalid blinded byte array"));
    }

    let prefix_len = bytes[0];
    let postfix_len = bytes[1];
    if prefix_len & 0x80 != 0 || postfix_len & 0x80 != 0 {
        return Err(Error::data_integrity("invalid blinded byte array"));
    }

    let k = packed::expected_length(bytes[2]);
    if 2 + k > bytes.len() {
        return Err(Error::data_integrity("invalid blinded byte array"));
    }
    let data_len = packed::decode(&bytes[2..2 + k])? as usize;

    let start = 2usize + prefix_len as usize + k;
    let end = start
        .checked_add(data_len)
        .ok_or_else(|| Error::data_integrity("invalid blinded byte array"))?;
    let total_needed = end
        .checked_add(postfix_len as usize)
        .ok_or_else(|| Error::data_integrity("invalid blinded byte array"))?;

    if total_needed > bytes.len() || end > bytes.len() {
        return Err(Error::data_integrity("invalid blinded byte array"));
    }

    Ok(bytes[start..end].to_vec())
}
